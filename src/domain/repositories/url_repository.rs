//! Repository trait for short URL data access.

use crate::domain::entities::{OwnerId, ShortUrl};
use async_trait::async_trait;
use chrono::Duration;

/// Errors reported by durable store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The alias is already taken. Backends must report this atomically on
    /// insert instead of overwriting the existing row.
    #[error("alias `{0}` already exists")]
    DuplicateAlias(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Durable store for short URLs, keyed by alias.
///
/// Lookups report absence as `Ok(None)`; only infrastructure failures are
/// errors. The store knows nothing about expiration: expired rows are
/// returned like any other and removed by the service.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Lists every stored URL of `owner`, expired ones included.
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<ShortUrl>, StoreError>;

    /// Inserts a new URL and returns its alias.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateAlias`] if the alias is taken.
    async fn create(&self, url: ShortUrl) -> Result<String, StoreError>;

    /// Point lookup by alias.
    async fn get(&self, alias: &str) -> Result<Option<ShortUrl>, StoreError>;

    /// Finds the URL created by `owner` for `original`.
    ///
    /// When several rows match (possible after racing creates), the one with
    /// the latest deadline is returned.
    async fn get_by_original_and_owner(
        &self,
        original: &str,
        owner: &OwnerId,
    ) -> Result<Option<ShortUrl>, StoreError>;

    /// Deletes a URL. Returns `Ok(false)` if nothing was stored under `alias`.
    async fn delete(&self, alias: &str) -> Result<bool, StoreError>;

    /// Pushes the expiration deadline of `alias` back by `duration`.
    ///
    /// Only `expired_at` is updated. Returns `Ok(false)` if nothing was stored
    /// under `alias`.
    async fn prolong(&self, alias: &str, duration: Duration) -> Result<bool, StoreError>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}
