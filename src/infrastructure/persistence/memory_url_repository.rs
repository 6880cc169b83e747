//! In-memory implementation of the short URL repository.

use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{OwnerId, ShortUrl};
use crate::domain::repositories::{StoreError, UrlRepository};

/// Short URL repository backed by a concurrent map, used by tests.
///
/// Insertion goes through the map's entry API so a duplicate alias is
/// rejected atomically, the same guarantee the PostgreSQL primary key gives.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    storage: DashMap<String, ShortUrl>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.storage.contains_key(alias)
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<ShortUrl>, StoreError> {
        let mut urls: Vec<ShortUrl> = self
            .storage
            .iter()
            .filter(|entry| &entry.owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        urls.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.alias.cmp(&b.alias)));

        Ok(urls)
    }

    async fn create(&self, url: ShortUrl) -> Result<String, StoreError> {
        match self.storage.entry(url.alias.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateAlias(url.alias)),
            Entry::Vacant(slot) => {
                let alias = url.alias.clone();
                slot.insert(url);
                Ok(alias)
            }
        }
    }

    async fn get(&self, alias: &str) -> Result<Option<ShortUrl>, StoreError> {
        Ok(self.storage.get(alias).map(|entry| entry.value().clone()))
    }

    async fn get_by_original_and_owner(
        &self,
        original: &str,
        owner: &OwnerId,
    ) -> Result<Option<ShortUrl>, StoreError> {
        Ok(self
            .storage
            .iter()
            .filter(|entry| entry.original == original && &entry.owner == owner)
            .max_by_key(|entry| entry.expired_at)
            .map(|entry| entry.value().clone()))
    }

    async fn delete(&self, alias: &str) -> Result<bool, StoreError> {
        Ok(self.storage.remove(alias).is_some())
    }

    async fn prolong(&self, alias: &str, duration: Duration) -> Result<bool, StoreError> {
        match self.storage.get_mut(alias) {
            Some(mut entry) => {
                entry.expired_at = entry
                    .expired_at
                    .checked_add_signed(duration)
                    .ok_or_else(|| StoreError::Backend("expiration out of range".to_string()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(alias: &str, original: &str, owner: &str) -> ShortUrl {
        ShortUrl::new(
            alias.to_string(),
            original.to_string(),
            OwnerId::new(owner),
            Utc::now(),
            Duration::seconds(60),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_alias() {
        let repo = MemoryUrlRepository::new();

        let alias = repo.create(sample("abc", "https://a.com", "u1")).await.unwrap();
        assert_eq!(alias, "abc");

        let err = repo
            .create(sample("abc", "https://b.com", "u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAlias(alias) if alias == "abc"));

        // The first record is untouched.
        let stored = repo.get("abc").await.unwrap().unwrap();
        assert_eq!(stored.original, "https://a.com");
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = MemoryUrlRepository::new();
        repo.create(sample("a1", "https://a.com", "u1")).await.unwrap();
        repo.create(sample("b1", "https://b.com", "u1")).await.unwrap();
        repo.create(sample("a2", "https://a.com", "u2")).await.unwrap();

        let owned = repo.list_by_owner(&OwnerId::new("u1")).await.unwrap();
        assert_eq!(owned.len(), 2);

        let found = repo
            .get_by_original_and_owner("https://a.com", &OwnerId::new("u2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.alias, "a2");

        assert!(
            repo.get_by_original_and_owner("https://b.com", &OwnerId::new("u2"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prolong_and_delete() {
        let repo = MemoryUrlRepository::new();
        let url = sample("abc", "https://a.com", "u1");
        let deadline = url.expired_at;
        repo.create(url).await.unwrap();

        assert!(repo.prolong("abc", Duration::seconds(30)).await.unwrap());
        let stored = repo.get("abc").await.unwrap().unwrap();
        assert_eq!(stored.expired_at, deadline + Duration::seconds(30));

        assert!(!repo.prolong("missing", Duration::seconds(30)).await.unwrap());

        assert!(repo.delete("abc").await.unwrap());
        assert!(!repo.delete("abc").await.unwrap());
        assert!(repo.is_empty());
    }
}
