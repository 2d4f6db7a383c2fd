//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (Redis, in-process, no-op)
//! - [`persistence`] - PostgreSQL and SQLite repository implementations

pub mod cache;
pub mod persistence;
