//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::ShortUrl;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache for short URL lookups.
///
/// Records are stored as JSON under `url:{alias}` with an expiry set by
/// `SET EX`. Uses `ConnectionManager` for automatic reconnection.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: Duration,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl: Duration) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, alias: &str) -> String {
        format!("{}{}", self.key_prefix, alias)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, alias: &str) -> CacheResult<Option<ShortUrl>> {
        let key = self.build_key(alias);
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::Operation(format!("GET {}: {}", key, e)))?;

        match raw {
            Some(json) => {
                debug!(alias, "Cache HIT");
                serde_json::from_str(&json)
                    .map(Some)
                    .map_err(|e| CacheError::Serialization(e.to_string()))
            }
            None => {
                debug!(alias, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        alias: &str,
        url: &ShortUrl,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        // SET EX has whole-second granularity; round down so an entry never
        // outlives the TTL it was given.
        let ttl_seconds = ttl.unwrap_or(self.default_ttl).as_secs();
        if ttl_seconds == 0 {
            debug!(alias, "Skipping cache SET with sub-second TTL");
            return Ok(());
        }

        let key = self.build_key(alias);
        let value =
            serde_json::to_string(url).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let mut conn = self.client.clone();

        conn.set_ex::<_, _, ()>(&key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::Operation(format!("SET {}: {}", key, e)))?;

        debug!(alias, ttl_seconds, "Cache SET");
        Ok(())
    }

    async fn invalidate(&self, alias: &str) -> CacheResult<()> {
        let key = self.build_key(alias);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&key)
            .await
            .map_err(|e| CacheError::Operation(format!("DEL {}: {}", key, e)))?;

        if deleted > 0 {
            debug!(alias, "Cache INVALIDATE");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
