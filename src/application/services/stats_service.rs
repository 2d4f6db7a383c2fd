//! Visit analytics service.

use std::sync::Arc;

use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::domain::stats::{UrlStats, group_visits};
use crate::error::AppError;
use serde_json::json;

/// Record and visit totals, used by health reporting and the admin CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageTotals {
    pub urls: i64,
    pub visits: i64,
}

/// Service for per-URL, per-IP visit summaries.
///
/// Summaries are computed in-process from the full visit log on every call; there
/// is no pagination or filtering.
pub struct StatsService<U = dyn UrlRepository, V = dyn VisitRepository>
where
    U: UrlRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    url_repository: Arc<U>,
    visit_repository: Arc<V>,
}

impl<U, V> StatsService<U, V>
where
    U: UrlRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    /// Creates a new statistics service.
    pub fn new(url_repository: Arc<U>, visit_repository: Arc<V>) -> Self {
        Self {
            url_repository,
            visit_repository,
        }
    }

    /// Returns every URL record, deleted ones included, with its visit groups.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_with_stats(&self) -> Result<Vec<UrlStats>, AppError> {
        let (urls, visits) = tokio::try_join!(
            self.url_repository.list_all(),
            self.visit_repository.list_all()
        )?;

        Ok(UrlStats::join(urls, group_visits(visits)))
    }

    /// Returns the record matching `identifier` (deleted or not) with its visits.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    pub async fn stats_for(&self, identifier: &str) -> Result<UrlStats, AppError> {
        let url = self
            .url_repository
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| {
                AppError::not_found("URL not found", json!({ "identifier": identifier }))
            })?;

        let visits = self.visit_repository.list_for_url(url.id).await?;
        let mut groups = group_visits(visits);
        let stats = groups.remove(&url.id).unwrap_or_default();

        Ok(UrlStats { url, stats })
    }

    /// Counts stored records and visits.
    pub async fn totals(&self) -> Result<StorageTotals, AppError> {
        let (urls, visits) = tokio::try_join!(
            self.url_repository.count(),
            self.visit_repository.count()
        )?;

        Ok(StorageTotals { urls, visits })
    }
}
