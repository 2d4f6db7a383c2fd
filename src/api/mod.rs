//! HTTP surface of the service.
//!
//! Handlers decode requests, call [`crate::application::services`] and map
//! [`crate::error::AppError`] onto status codes. The redirect handler is the
//! exception: domain failures there become redirects to static error pages.
//!
//! - [`dto`] - Request bodies and JSON responses
//! - [`handlers`] - One module per endpoint group
//! - [`middleware`] - Throttling, CORS and tracing layers
//! - [`routes`] - The `/api/v1/urls` router

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
