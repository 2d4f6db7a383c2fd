//! HTTP middleware for request processing and protection.
//!
//! Provides throttling, CORS, and observability middleware.

pub mod cors;
pub mod rate_limit;
pub mod tracing;
