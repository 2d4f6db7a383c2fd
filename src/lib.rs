//! # shorturl
//!
//! A URL shortening service with aliases, soft deletion, per-URL visit quotas and
//! per-visit analytics, built with Axum and SQLx.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits, visit aggregation
//! - **Application Layer** ([`application`]) - Shorten / update / delete / redirect
//!   and statistics services
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL/SQLite storage and
//!   the redirect cache
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Redirect semantics
//!
//! A redirect resolved from storage increments the record's visit counter (only
//! while under its quota) and appends one visit log entry. The resolved mapping is
//! then cached; cached redirects are served without counting or logging.
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://data/shorturl.db"   # or postgres://...
//! cargo run
//!
//! curl -X POST localhost:3000/api/v1/urls \
//!      -H 'content-type: application/json' \
//!      -d '{"originalUrl":"https://example.com"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{StatsService, UrlService};
    pub use crate::domain::entities::{UrlRecord, Visit, VisitorInfo};
    pub use crate::domain::stats::UrlStats;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::Database;
    pub use crate::state::AppState;
}
