//! Short URL entity and its expiration rule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the principal that owns a short URL.
///
/// The identity layer hands these out; the core only compares them and
/// uses their string form when deriving aliases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Stable string form used for alias derivation and storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A shortened URL.
///
/// `alias` is the primary key. The record is live until `expired_at`; after
/// that it is only ever observed as expired and removed on the next access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub alias: String,
    pub original: String,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    pub owner: OwnerId,
}

impl ShortUrl {
    /// Creates a record that lives for `duration` starting at `created_at`.
    ///
    /// `duration` must be positive; the service resolves zero or negative
    /// requests to its configured default before calling this. A deadline
    /// past the representable range saturates at [`DateTime::<Utc>::MAX_UTC`].
    pub fn new(
        alias: String,
        original: String,
        owner: OwnerId,
        created_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        debug_assert!(duration > Duration::zero());

        Self {
            alias,
            original,
            created_at,
            expired_at: created_at
                .checked_add_signed(duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            owner,
        }
    }

    /// Returns true once `now` has reached the expiration deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expired_at
    }

    /// Time left before expiration, or `None` if already expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        (self.expired_at - now).to_std().ok().filter(|d| !d.is_zero())
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner == owner
    }
}
