//! URL record lifecycle and the redirect path.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{AccessOutcome, NewUrlRecord, UrlPatch, UrlRecord, VisitorInfo};
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, validate_alias};
use crate::utils::url_validator::validate_url;

/// Attempts at finding an unused short code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for shortening, updating, deleting and resolving URL records.
///
/// Resolved mappings are memoized in the cache under both the short code and the
/// alias. A cache hit returns immediately and does not count towards the visit
/// quota or the visit log; updates and deletes evict the affected keys.
pub struct UrlService<U = dyn UrlRepository, V = dyn VisitRepository>
where
    U: UrlRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    url_repository: Arc<U>,
    visit_repository: Arc<V>,
    cache: Arc<dyn CacheService>,
    cache_ttl_seconds: u64,
}

impl<U, V> UrlService<U, V>
where
    U: UrlRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    /// Creates a new URL service.
    pub fn new(
        url_repository: Arc<U>,
        visit_repository: Arc<V>,
        cache: Arc<dyn CacheService>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            url_repository,
            visit_repository,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Creates a record for `original_url` under a fresh random short code.
    ///
    /// The URL is stored as submitted. A new record is created on every call, so
    /// shortening the same URL twice yields two independent codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute http(s) URL.
    /// Returns [`AppError::Internal`] if no unused code was found.
    pub async fn shorten(&self, original_url: &str) -> Result<UrlRecord, AppError> {
        validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL.", json!({ "reason": e.to_string() }))
        })?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code();

            if self
                .url_repository
                .find_by_identifier(&code)
                .await?
                .is_some()
            {
                debug!(code = %code, "Short code collision, retrying");
                continue;
            }

            let new_url = NewUrlRecord {
                original_url: original_url.to_string(),
                short_url: code,
            };

            match self.url_repository.create(new_url).await {
                Ok(record) => {
                    metrics::counter!("urls_created_total").increment(1);
                    tracing::info!(short_url = %record.short_url, "Short URL created");
                    return Ok(record);
                }
                // Lost a race for the same code.
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Sets the alias and visit quota of the live record matching `identifier`.
    ///
    /// `rate_limit: None` clears the quota; `Some(0)` stores zero, which also
    /// means unlimited.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed alias or a negative quota
    /// - [`AppError::Conflict`] if another live record holds `alias` as its alias
    ///   or short code
    /// - [`AppError::NotFound`] if no live record matches `identifier`
    pub async fn update_alias(
        &self,
        identifier: &str,
        alias: String,
        rate_limit: Option<i64>,
    ) -> Result<UrlRecord, AppError> {
        validate_alias(&alias)?;

        if let Some(limit) = rate_limit
            && limit < 0
        {
            return Err(AppError::bad_request(
                "Rate limit must be a non-negative integer",
                json!({ "rate_limit": limit }),
            ));
        }

        let holders = self.url_repository.find_live_holders(&alias).await?;
        if holders.iter().any(|holder| !holder.matches(identifier)) {
            return Err(AppError::conflict(
                "Alias already used before",
                json!({ "alias": alias }),
            ));
        }

        let target = self
            .url_repository
            .find_live_by_identifier(identifier)
            .await?
            .ok_or_else(|| url_not_found(identifier))?;

        let updated = self
            .url_repository
            .update(
                target.id,
                UrlPatch {
                    alias: alias.clone(),
                    rate_limit,
                },
            )
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => AppError::conflict(
                    "Alias already used before",
                    json!({ "alias": alias }),
                ),
                other => other,
            })?;

        let mut keys = owned_keys(&target);
        keys.push(alias);
        self.evict(&keys).await;

        Ok(updated)
    }

    /// Soft-deletes the live record matching `identifier`.
    ///
    /// The record and its visits stay listed; redirects to it report gone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live record matches.
    pub async fn delete(&self, identifier: &str) -> Result<(), AppError> {
        let target = self
            .url_repository
            .find_live_by_identifier(identifier)
            .await?
            .ok_or_else(|| url_not_found(identifier))?;

        if !self.url_repository.soft_delete(target.id).await? {
            return Err(url_not_found(identifier));
        }

        self.evict(&owned_keys(&target)).await;
        tracing::info!(short_url = %target.short_url, "Short URL deleted");

        Ok(())
    }

    /// Resolves `identifier` to its original URL and records the visit.
    ///
    /// # Flow
    ///
    /// 1. Cache hit: return immediately (no quota check, no counter, no visit log)
    /// 2. Look up by short code or alias among all records
    /// 3. Atomically increment the counter if the record is live and under quota
    /// 4. Append the visit
    /// 5. Cache the mapping under the short code and the alias
    ///
    /// Cache failures are logged and treated as a miss.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if nothing matches
    /// - [`AppError::Gone`] if the record is soft-deleted
    /// - [`AppError::Forbidden`] if the visit quota is used up
    pub async fn redirect(
        &self,
        identifier: &str,
        visitor: VisitorInfo,
    ) -> Result<String, AppError> {
        match self.cache.get_url(identifier).await {
            Ok(Some(url)) => {
                debug!("Cache HIT for {}", identifier);
                record_redirect("cache_hit");
                return Ok(url);
            }
            Ok(None) => debug!("Cache MISS for {}", identifier),
            Err(e) => warn!("Cache error: {}", e),
        }

        let result = self.resolve_and_count(identifier, visitor).await;

        record_redirect(match &result {
            Ok(_) => "granted",
            Err(AppError::NotFound { .. }) => "not_found",
            Err(AppError::Gone { .. }) => "gone",
            Err(AppError::Forbidden { .. }) => "rate_limited",
            Err(_) => "error",
        });

        let record = result?;

        for key in record.cache_keys() {
            if let Err(e) = self
                .cache
                .set_url(key, &record.original_url, Some(self.cache_ttl_seconds))
                .await
            {
                warn!("Failed to cache URL: {}", e);
            }
        }

        Ok(record.original_url)
    }

    async fn resolve_and_count(
        &self,
        identifier: &str,
        visitor: VisitorInfo,
    ) -> Result<UrlRecord, AppError> {
        let record = self
            .url_repository
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| url_not_found(identifier))?;

        if record.deleted {
            return Err(url_deleted(identifier));
        }

        let record = match self.url_repository.try_record_access(record.id).await? {
            AccessOutcome::Granted(updated) => updated,
            AccessOutcome::Deleted => return Err(url_deleted(identifier)),
            AccessOutcome::LimitReached => {
                return Err(AppError::forbidden(
                    "Request limit exceeded for this URL",
                    json!({ "identifier": identifier, "rate_limit": record.rate_limit }),
                ));
            }
            AccessOutcome::Missing => return Err(url_not_found(identifier)),
        };

        // Counter and visit are separate writes; a failure here leaves the
        // counter ahead of the log.
        self.visit_repository
            .record_visit(visitor.into_new_visit(record.id, Utc::now()))
            .await?;

        Ok(record)
    }

    async fn evict(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.cache.invalidate(key).await {
                warn!("Failed to invalidate cache key {}: {}", key, e);
            }
        }
    }
}

/// Cache keys of `record` as owned strings.
fn owned_keys(record: &UrlRecord) -> Vec<String> {
    record.cache_keys().into_iter().map(str::to_string).collect()
}

fn record_redirect(outcome: &'static str) {
    metrics::counter!("redirects_total", "outcome" => outcome).increment(1);
}

fn url_not_found(identifier: &str) -> AppError {
    AppError::not_found("URL not found", json!({ "identifier": identifier }))
}

fn url_deleted(identifier: &str) -> AppError {
    AppError::gone("URL deleted", json!({ "identifier": identifier }))
}
