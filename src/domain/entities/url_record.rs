//! URL record entity: the mapping from a short identifier (and optional alias)
//! to an original URL, plus its quota and visit counter.

use chrono::{DateTime, Utc};

/// A stored URL record.
///
/// `short_url` is system-generated and never changes once assigned. `alias` is a
/// user-chosen token that resolves exactly like `short_url`. Deletion is soft: the
/// record stays in storage with `deleted = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub alias: Option<String>,
    pub access_count: i64,
    pub deleted: bool,
    pub rate_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        original_url: String,
        short_url: String,
        alias: Option<String>,
        access_count: i64,
        deleted: bool,
        rate_limit: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_url,
            alias,
            access_count,
            deleted,
            rate_limit,
            created_at,
        }
    }

    /// Returns the effective visit quota, treating `0` as "no limit".
    pub fn effective_rate_limit(&self) -> Option<i64> {
        self.rate_limit.filter(|limit| *limit > 0)
    }

    /// Returns true if the visit quota has been used up.
    pub fn is_rate_limited(&self) -> bool {
        self.effective_rate_limit()
            .is_some_and(|limit| self.access_count >= limit)
    }

    /// Returns true if `identifier` is this record's short code or alias.
    pub fn matches(&self, identifier: &str) -> bool {
        self.short_url == identifier || self.alias.as_deref() == Some(identifier)
    }

    /// Cache keys under which this record's original URL may be memoized.
    pub fn cache_keys(&self) -> Vec<&str> {
        std::iter::once(self.short_url.as_str())
            .chain(self.alias.as_deref())
            .collect()
    }
}

/// Input data for creating a new URL record.
#[derive(Debug, Clone)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_url: String,
}

/// Alias and quota update for an existing record.
///
/// Both fields are written as given: `rate_limit: None` clears the quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPatch {
    pub alias: String,
    pub rate_limit: Option<i64>,
}

/// Result of an atomic "increment if allowed" on the visit counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Counter incremented; carries the updated record.
    Granted(UrlRecord),
    /// Record was soft-deleted before the increment could apply.
    Deleted,
    /// Quota reached; the counter was left unchanged.
    LimitReached,
    /// Record vanished between lookup and increment.
    Missing,
}
