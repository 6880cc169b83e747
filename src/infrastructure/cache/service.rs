//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::ShortUrl;

/// Errors that can occur during cache operations.
///
/// A miss is not an error: [`CacheService::get_url`] reports it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache operation error: {0}")]
    Operation(String),

    #[error("cache value is invalid: {0}")]
    Serialization(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Ephemeral store for short URLs, keyed by alias.
///
/// Implementations report failures instead of hiding them; the service
/// decides that a cache failure is only ever logged.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached URL.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_url(&self, alias: &str) -> CacheResult<Option<ShortUrl>>;

    /// Stores a URL under `alias`.
    ///
    /// `ttl` of `None` applies the implementation's default TTL.
    async fn set_url(&self, alias: &str, url: &ShortUrl, ttl: Option<Duration>)
    -> CacheResult<()>;

    /// Removes a cached URL. Removing a missing key is not an error.
    async fn invalidate(&self, alias: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
