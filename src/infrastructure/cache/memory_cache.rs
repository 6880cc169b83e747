//! In-process cache implementation.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::ShortUrl;
use crate::utils::clock::{Clock, SystemClock};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Entry {
    url: ShortUrl,
    evict_at: DateTime<Utc>,
}

/// A single-node cache backed by a concurrent map.
///
/// Entries expire against the injected [`Clock`], so a manually driven clock
/// ages the cache and the records in it together. Expired entries are
/// dropped lazily on lookup.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, Entry>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl,
            clock,
        }
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Arc::new(SystemClock))
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, alias: &str) -> CacheResult<Option<ShortUrl>> {
        let now = self.clock.now();

        let hit = self
            .entries
            .get(alias)
            .filter(|entry| now < entry.evict_at)
            .map(|entry| entry.url.clone());

        if hit.is_none() {
            // Drop an entry whose TTL ran out, if there was one.
            self.entries.remove_if(alias, |_, entry| now >= entry.evict_at);
            trace!(alias, "Memory cache MISS");
        } else {
            trace!(alias, "Memory cache HIT");
        }

        Ok(hit)
    }

    async fn set_url(
        &self,
        alias: &str,
        url: &ShortUrl,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            debug!(alias, "TTL out of range, not caching");
            return Ok(());
        };

        self.entries.insert(
            alias.to_string(),
            Entry {
                url: url.clone(),
                evict_at: self.clock.now() + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, alias: &str) -> CacheResult<()> {
        self.entries.remove(alias);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
