//! Application layer services implementing business logic.
//!
//! Services consume the repository traits and the cache, and expose the
//! operations used by HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Shorten, alias update, soft delete, redirect
//! - [`services::stats_service::StatsService`] - Per-URL, per-IP visit summaries

pub mod services;
