//! Repository trait for API token authentication.

use crate::domain::entities::OwnerId;
use crate::domain::repositories::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// API token entity with metadata.
///
/// Tokens are stored as HMAC-SHA256 hashes; the raw value is shown once at
/// creation and never persisted. Each token authenticates as one owner.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub owner: OwnerId,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Repository interface for API token management.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryTokenRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Finds a non-revoked token by its hash.
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, StoreError>;

    /// Updates the `last_used_at` timestamp for a token.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), StoreError>;

    /// Creates a new API token for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the name or hash is already taken.
    async fn create_token(
        &self,
        name: &str,
        owner: &OwnerId,
        token_hash: &str,
    ) -> Result<ApiToken, StoreError>;

    /// Lists all tokens, newest first.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, StoreError>;

    /// Finds a token by its name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, StoreError>;

    /// Revokes a token. Returns `Ok(false)` if it was missing or already revoked.
    async fn revoke_token(&self, id: i64) -> Result<bool, StoreError>;
}
