//! Storage implementations of the domain repository traits.
//!
//! Runtime-checked SQLx queries against either PostgreSQL or SQLite; the backend is
//! picked by [`Database::connect`] from the connection string.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] / [`SqliteUrlRepository`] - URL records
//! - [`PgVisitRepository`] / [`SqliteVisitRepository`] - Visit log

pub mod database;
pub mod pg_url_repository;
pub mod pg_visit_repository;
mod rows;
pub mod sqlite_url_repository;
pub mod sqlite_visit_repository;

pub use database::{Database, DatabaseBackend, PoolSettings};
pub use pg_url_repository::PgUrlRepository;
pub use pg_visit_repository::PgVisitRepository;
pub use sqlite_url_repository::SqliteUrlRepository;
pub use sqlite_visit_repository::SqliteVisitRepository;
