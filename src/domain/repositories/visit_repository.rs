//! Repository trait for the append-only visit log.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for visit-log entries.
///
/// Entries are never updated or deleted. Listing methods return entries in write
/// order, which the stats aggregation relies on.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::SqliteVisitRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends one visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a dangling
    /// `url_id`.
    async fn record_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Returns the whole log in write order.
    async fn list_all(&self) -> Result<Vec<Visit>, AppError>;

    /// Returns the log of one URL in write order.
    async fn list_for_url(&self, url_id: i64) -> Result<Vec<Visit>, AppError>;

    /// Counts all visits.
    async fn count(&self) -> Result<i64, AppError>;
}
