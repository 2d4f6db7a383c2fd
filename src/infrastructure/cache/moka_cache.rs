//! In-process cache backed by `moka`.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone)]
struct CachedUrl {
    url: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with; re-inserting resets it.
struct PerEntryTtl;

impl Expiry<String, CachedUrl> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrl,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache local to one process, used when no Redis is configured.
pub struct MokaCache {
    inner: Cache<String, CachedUrl>,
    default_ttl: Duration,
}

impl MokaCache {
    pub fn new(max_capacity: u64, default_ttl_seconds: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(
            "MokaCache initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl_seconds
        );

        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MokaCache {
    async fn get_url(&self, key: &str) -> CacheResult<Option<String>> {
        let hit = self.inner.get(key).await.map(|entry| entry.url);
        if hit.is_some() {
            debug!("Cache HIT: {}", key);
        } else {
            debug!("Cache MISS: {}", key);
        }
        Ok(hit)
    }

    async fn set_url(
        &self,
        key: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        self.inner
            .insert(
                key.to_string(),
                CachedUrl {
                    url: original_url.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MokaCache::new(100, 600);
        cache
            .set_url("abc123", "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(cache.get_url("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = MokaCache::new(100, 600);
        cache
            .set_url("abc123", "https://example.com", None)
            .await
            .unwrap();
        cache.invalidate("abc123").await.unwrap();

        assert_eq!(cache.get_url("abc123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MokaCache::new(100, 600);
        cache
            .set_url("short", "https://example.com", Some(1))
            .await
            .unwrap();

        assert!(cache.get_url("short").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1_200)).await;

        assert_eq!(cache.get_url("short").await.unwrap(), None);
    }
}
