//! In-memory implementation of token repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::OwnerId;
use crate::domain::repositories::{ApiToken, StoreError, TokenRepository};

/// Token repository backed by a concurrent map keyed by token hash.
#[derive(Debug, Default)]
pub struct MemoryTokenRepository {
    tokens: DashMap<String, ApiToken>,
    next_id: AtomicI64,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, StoreError> {
        Ok(self
            .tokens
            .get(token_hash)
            .filter(|token| !token.is_revoked())
            .map(|token| token.value().clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), StoreError> {
        if let Some(mut token) = self.tokens.get_mut(token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        owner: &OwnerId,
        token_hash: &str,
    ) -> Result<ApiToken, StoreError> {
        if self.tokens.iter().any(|token| token.name == name) {
            return Err(StoreError::Backend(format!(
                "token name `{}` already exists",
                name
            )));
        }

        let token = ApiToken {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            name: name.to_string(),
            owner: owner.clone(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };

        match self.tokens.entry(token_hash.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Backend(
                "token hash already exists".to_string(),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(token.clone());
                Ok(token)
            }
        }
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, StoreError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, StoreError> {
        Ok(self
            .tokens
            .iter()
            .find(|token| token.name == name)
            .map(|token| token.value().clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, StoreError> {
        for mut token in self.tokens.iter_mut() {
            if token.id == id && token.revoked_at.is_none() {
                token.revoked_at = Some(Utc::now());
                return Ok(true);
            }
        }
        Ok(false)
    }
}
