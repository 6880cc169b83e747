//! Short URL lifecycle service.
//!
//! Owns every policy decision about short URLs: deduplication, per-owner
//! quota, alias allocation with collision retry, lazy expiration and the
//! cache-aside read path. Repositories and caches stay dumb.

use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::{OwnerId, ShortUrl};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::infrastructure::cache::CacheService;
use crate::utils::alias_encoder::{AliasEncoder, EncodeError};
use crate::utils::clock::Clock;

/// Errors returned by [`UrlService`].
///
/// Cache failures never show up here; they are logged and the store is used
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("a live short URL already exists for this target: `{alias}`")]
    AlreadyExists { alias: String },

    #[error("owner reached the limit of {limit} live short URLs")]
    QuotaExceeded { limit: usize },

    #[error("every alias candidate for this target is taken")]
    NoPossibleEncoding,

    #[error("alias encoding failed: {0}")]
    Encoding(EncodeError),

    #[error("short URL not found")]
    NotFound,

    #[error("short URL has expired")]
    Expired,

    #[error("short URL belongs to another owner")]
    Forbidden,

    #[error("expiration deadline is out of range")]
    DurationOutOfRange,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tunables of the short URL lifecycle.
#[derive(Debug, Clone)]
pub struct UrlSettings {
    /// Length of generated aliases.
    pub alias_length: usize,
    /// Lifetime used when the caller asks for a zero or negative duration.
    pub default_duration: Duration,
    /// Shortest lifetime a record may be given.
    pub min_duration: Duration,
    /// Live records allowed per owner.
    pub count_limit: usize,
    /// Upper bound for how long a record stays in the cache.
    pub cache_ttl: std::time::Duration,
    /// Deadline for detached cache fills and expired-record cleanups.
    pub background_timeout: std::time::Duration,
}

impl Default for UrlSettings {
    fn default() -> Self {
        Self {
            alias_length: 8,
            default_duration: Duration::days(30),
            min_duration: Duration::seconds(60),
            count_limit: 100,
            cache_ttl: std::time::Duration::from_secs(60),
            background_timeout: std::time::Duration::from_millis(2000),
        }
    }
}

/// Service creating, resolving and managing short URLs.
///
/// Creation never touches the cache. Reads go cache first, then store, and
/// refill the cache in a detached task. Expired records are removed lazily by
/// whichever read observes them.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    encoder: Arc<dyn AliasEncoder>,
    clock: Arc<dyn Clock>,
    settings: UrlSettings,
}

impl UrlService {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        encoder: Arc<dyn AliasEncoder>,
        clock: Arc<dyn Clock>,
        settings: UrlSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            encoder,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &UrlSettings {
        &self.settings
    }

    /// Creates a short URL for `original` on behalf of `owner`.
    ///
    /// A zero or negative `duration` selects the configured default; shorter
    /// than the configured minimum is raised to it.
    ///
    /// # Deduplication
    ///
    /// An owner has at most one live short URL per target. An expired one is
    /// removed first and replaced.
    ///
    /// # Errors
    ///
    /// - [`UrlError::AlreadyExists`] if the owner already has a live short URL for `original`
    /// - [`UrlError::QuotaExceeded`] if the owner is at the live record limit
    /// - [`UrlError::NoPossibleEncoding`] if every alias window collided
    /// - [`UrlError::DurationOutOfRange`] if the deadline is not representable
    /// - [`UrlError::Encoding`] / [`UrlError::Store`] on encoder or store failures
    pub async fn create(
        &self,
        original: &str,
        owner: &OwnerId,
        duration: Duration,
    ) -> Result<ShortUrl, UrlError> {
        let now = self.clock.now();

        match self
            .repository
            .get_by_original_and_owner(original, owner)
            .await?
        {
            Some(existing) if !existing.is_expired(now) => {
                return Err(UrlError::AlreadyExists {
                    alias: existing.alias,
                });
            }
            Some(stale) => {
                debug!(alias = %stale.alias, %owner, "Replacing expired short URL");
                if let Err(e) = self.repository.delete(&stale.alias).await {
                    warn!(alias = %stale.alias, error = %e, "Failed to delete expired short URL");
                }
            }
            None => {}
        }

        let live = self.list_by_owner(owner).await?;
        if live.len() >= self.settings.count_limit {
            return Err(UrlError::QuotaExceeded {
                limit: self.settings.count_limit,
            });
        }

        let duration = self.effective_duration(duration);
        if now.checked_add_signed(duration).is_none() {
            return Err(UrlError::DurationOutOfRange);
        }

        let length = self.settings.alias_length;
        let mut attempt = 0;

        loop {
            let alias = match self.encoder.encode(original, owner, attempt, length) {
                Ok(alias) => alias,
                Err(EncodeError::AliasSpaceExhausted { .. }) => {
                    warn!(%owner, attempt, "Alias space exhausted");
                    return Err(UrlError::NoPossibleEncoding);
                }
                Err(e) => return Err(UrlError::Encoding(e)),
            };

            let url = ShortUrl::new(alias, original.to_string(), owner.clone(), now, duration);

            match self.repository.create(url).await {
                Ok(alias) => {
                    info!(%alias, %owner, attempt, "Short URL created");
                    return self
                        .repository
                        .get(&alias)
                        .await?
                        .ok_or(UrlError::NotFound);
                }
                Err(StoreError::DuplicateAlias(alias)) => {
                    warn!(%alias, attempt, "Alias collision, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Lists the live short URLs of `owner`.
    ///
    /// Expired records found along the way are deleted before returning.
    pub async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<ShortUrl>, UrlError> {
        let now = self.clock.now();
        let urls = self.repository.list_by_owner(owner).await?;

        let (live, expired): (Vec<_>, Vec<_>) =
            urls.into_iter().partition(|url| !url.is_expired(now));

        if expired.is_empty() {
            return Ok(live);
        }

        for url in &expired {
            if let Err(e) = self.repository.delete(&url.alias).await {
                warn!(alias = %url.alias, error = %e, "Failed to prune expired short URL");
            }
        }
        debug!(%owner, pruned = expired.len(), "Pruned expired short URLs");

        let urls = self.repository.list_by_owner(owner).await?;
        Ok(urls.into_iter().filter(|url| !url.is_expired(now)).collect())
    }

    /// Resolves an alias through the cache-aside read path.
    ///
    /// # Errors
    ///
    /// - [`UrlError::NotFound`] if no record exists
    /// - [`UrlError::Expired`] if the record is past its deadline (it is removed in the background)
    pub async fn get(&self, alias: &str) -> Result<ShortUrl, UrlError> {
        self.fetch(alias, true).await
    }

    /// Same as [`Self::get`], restricted to records owned by `owner`.
    ///
    /// Returns [`UrlError::Forbidden`] for someone else's record.
    pub async fn get_by_owner(&self, alias: &str, owner: &OwnerId) -> Result<ShortUrl, UrlError> {
        self.fetch_owned(alias, owner, true).await
    }

    /// Pushes the deadline of an owned, live record back by `duration`.
    ///
    /// `duration` is resolved like in [`Self::create`]. Expired records cannot
    /// be prolonged.
    pub async fn prolong(
        &self,
        alias: &str,
        owner: &OwnerId,
        duration: Duration,
    ) -> Result<ShortUrl, UrlError> {
        let current = self.fetch_owned(alias, owner, false).await?;

        let duration = self.effective_duration(duration);
        if current.expired_at.checked_add_signed(duration).is_none() {
            return Err(UrlError::DurationOutOfRange);
        }

        let updated = self.repository.prolong(alias, duration).await?;
        self.invalidate_cache(alias).await;

        if !updated {
            return Err(UrlError::NotFound);
        }

        info!(%alias, %owner, seconds = duration.num_seconds(), "Short URL prolonged");
        self.get_by_owner(alias, owner).await
    }

    /// Deletes an owned, live record.
    pub async fn delete(&self, alias: &str, owner: &OwnerId) -> Result<(), UrlError> {
        self.fetch_owned(alias, owner, false).await?;

        let deleted = self.repository.delete(alias).await?;
        self.invalidate_cache(alias).await;

        if !deleted {
            return Err(UrlError::NotFound);
        }

        info!(%alias, %owner, "Short URL deleted");
        Ok(())
    }

    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    async fn fetch_owned(
        &self,
        alias: &str,
        owner: &OwnerId,
        fill_cache: bool,
    ) -> Result<ShortUrl, UrlError> {
        let url = self.fetch(alias, fill_cache).await?;

        if !url.is_owned_by(owner) {
            return Err(UrlError::Forbidden);
        }

        Ok(url)
    }

    /// Cache-aside lookup. Mutating callers pass `fill_cache = false` so a
    /// detached fill cannot land after their invalidation.
    async fn fetch(&self, alias: &str, fill_cache: bool) -> Result<ShortUrl, UrlError> {
        let now = self.clock.now();

        match self.cache.get_url(alias).await {
            Ok(Some(url)) => {
                if !self.recheck_cache_hits() || !url.is_expired(now) {
                    debug!(%alias, "Cache HIT");
                    return Ok(url);
                }
                debug!(%alias, "Cache HIT on expired short URL");
                self.spawn_expired_cleanup(alias);
                return Err(UrlError::Expired);
            }
            Ok(None) => debug!(%alias, "Cache MISS"),
            Err(e) => warn!(%alias, error = %e, "Cache lookup failed, falling back to store"),
        }

        let url = self
            .repository
            .get(alias)
            .await?
            .ok_or(UrlError::NotFound)?;

        if url.is_expired(now) {
            self.spawn_expired_cleanup(alias);
            return Err(UrlError::Expired);
        }

        if fill_cache {
            self.spawn_cache_fill(url.clone(), now);
        }

        Ok(url)
    }

    /// Cache entries are capped at the record's remaining lifetime, but a
    /// cache TTL longer than the shortest record lifetime still gets hits
    /// checked against the clock.
    fn recheck_cache_hits(&self) -> bool {
        match self.settings.min_duration.to_std() {
            Ok(min) => self.settings.cache_ttl > min,
            Err(_) => true,
        }
    }

    fn effective_duration(&self, requested: Duration) -> Duration {
        let duration = if requested <= Duration::zero() {
            self.settings.default_duration
        } else {
            requested
        };

        duration.max(self.settings.min_duration)
    }

    async fn invalidate_cache(&self, alias: &str) {
        if let Err(e) = self.cache.invalidate(alias).await {
            warn!(%alias, error = %e, "Failed to invalidate cached short URL");
        }
    }

    fn spawn_cache_fill(&self, url: ShortUrl, now: DateTime<Utc>) {
        let Some(remaining) = url.remaining(now) else {
            return;
        };
        let ttl = remaining.min(self.settings.cache_ttl);
        let cache = Arc::clone(&self.cache);
        let alias = url.alias.clone();

        self.spawn_background("cache_fill", alias.clone(), async move {
            if let Err(e) = cache.set_url(&alias, &url, Some(ttl)).await {
                warn!(%alias, error = %e, "Failed to cache short URL");
            }
        });
    }

    fn spawn_expired_cleanup(&self, alias: &str) {
        let cache = Arc::clone(&self.cache);
        let repository = Arc::clone(&self.repository);
        let clock = Arc::clone(&self.clock);
        let target = alias.to_string();

        self.spawn_background("expired_cleanup", alias.to_string(), async move {
            if let Err(e) = cache.invalidate(&target).await {
                warn!(alias = %target, error = %e, "Failed to evict expired short URL");
            }
            match remove_if_expired(repository.as_ref(), clock.as_ref(), &target).await {
                Ok(true) => debug!(alias = %target, "Expired short URL removed"),
                Ok(false) => debug!(alias = %target, "Short URL no longer expired, kept"),
                Err(e) => warn!(alias = %target, error = %e, "Failed to delete expired short URL"),
            }
        });
    }

    /// Runs `work` detached from the caller under the background deadline.
    fn spawn_background<F>(&self, task: &'static str, alias: String, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = self.settings.background_timeout;

        tokio::spawn(async move {
            if tokio::time::timeout(deadline, work).await.is_err() {
                warn!(task, %alias, ?deadline, "Background task timed out");
            }
        });
    }
}

/// Deletes `alias` only if the stored row is still expired, so a record
/// recreated under the same alias since the expired read survives.
async fn remove_if_expired(
    repository: &dyn UrlRepository,
    clock: &dyn Clock,
    alias: &str,
) -> Result<bool, StoreError> {
    match repository.get(alias).await? {
        Some(url) if url.is_expired(clock.now()) => repository.delete(alias).await,
        _ => Ok(false),
    }
}
