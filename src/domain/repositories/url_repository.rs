//! Repository trait for URL record data access.

use crate::domain::entities::{AccessOutcome, NewUrlRecord, UrlPatch, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for URL records.
///
/// Lookups by "identifier" match either the short code or the alias.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record with zero visits.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by its system-generated short code, deleted or not.
    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by short code or alias among all records.
    ///
    /// When several records match, live records win over deleted ones and newer
    /// records over older ones.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a non-deleted record by short code or alias.
    async fn find_live_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UrlRecord>, AppError>;

    /// Returns every live record holding `token` as short code or alias.
    ///
    /// Used to decide whether an alias is still free.
    async fn find_live_holders(&self, token: &str) -> Result<Vec<UrlRecord>, AppError>;

    /// Writes alias and rate limit on a live record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live record has this id.
    /// Returns [`AppError::Conflict`] if the alias index rejects the write.
    async fn update(&self, id: i64, patch: UrlPatch) -> Result<UrlRecord, AppError>;

    /// Flips `deleted` to true.
    ///
    /// Returns `Ok(false)` if the record is missing or already deleted.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically increments the visit counter when the record is live and under
    /// its quota.
    ///
    /// The check and the increment happen in one conditional update, so concurrent
    /// redirects cannot push the counter past the limit.
    async fn try_record_access(&self, id: i64) -> Result<AccessOutcome, AppError>;

    /// Lists every record, deleted ones included, oldest first.
    async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts all records.
    async fn count(&self) -> Result<i64, AppError>;
}
