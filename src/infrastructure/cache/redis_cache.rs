//! Redis-backed cache shared between service instances.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Namespace for identifier -> original URL entries.
const KEY_PREFIX: &str = "shorturl:url:";

/// Identifier mappings stored as plain strings with `SET EX`.
///
/// `ConnectionManager` reconnects on its own. Command failures after startup are
/// logged and reported as a miss (reads) or as done (writes).
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl_seconds: u64,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid or the server
    /// does not answer.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(connection_error)?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(connection_error)?;

        conn.ping::<()>().await.map_err(connection_error)?;
        info!(default_ttl_seconds, "Redis cache connected");

        Ok(Self {
            conn,
            default_ttl_seconds,
        })
    }
}

fn connection_error(e: RedisError) -> CacheError {
    CacheError::ConnectionError(e.to_string())
}

fn redis_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        let hit = conn
            .get::<_, Option<String>>(redis_key(key))
            .await
            .unwrap_or_else(|e| {
                warn!(key, error = %e, "Redis GET failed");
                None
            });

        debug!(key, hit = hit.is_some(), "Redis lookup");
        Ok(hit)
    }

    async fn set_url(
        &self,
        key: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl_seconds);

        if let Err(e) = conn
            .set_ex::<_, _, ()>(redis_key(key), original_url, ttl)
            .await
        {
            warn!(key, error = %e, "Redis SET failed");
        }
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match conn.del::<_, u32>(redis_key(key)).await {
            Ok(0) => {}
            Ok(_) => debug!(key, "Redis entry evicted"),
            Err(e) => warn!(key, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
