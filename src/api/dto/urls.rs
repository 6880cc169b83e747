//! DTOs for short URL management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{OwnerId, ShortUrl};

/// Longest lifetime a client may request in one call (ten years).
pub const MAX_DURATION_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Request to shorten a URL.
///
/// A missing, zero or negative `duration_seconds` selects the server default.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub original: String,

    #[validate(range(max = MAX_DURATION_SECONDS, message = "Duration is too long"))]
    pub duration_seconds: Option<i64>,
}

/// Request to push a short URL's deadline back.
#[derive(Debug, Deserialize, Validate)]
pub struct ProlongUrlRequest {
    #[validate(range(max = MAX_DURATION_SECONDS, message = "Duration is too long"))]
    pub duration_seconds: i64,
}

/// JSON representation of a short URL.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub alias: String,
    pub short_url: String,
    pub original: String,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl UrlResponse {
    pub fn new(url: ShortUrl, short_url: String) -> Self {
        Self {
            alias: url.alias,
            short_url,
            original: url.original,
            owner: url.owner,
            created_at: url.created_at,
            expired_at: url.expired_at,
        }
    }
}

/// The caller's live short URLs.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub total: usize,
    pub items: Vec<UrlResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = CreateUrlRequest {
            original: "https://example.com/page".to_string(),
            duration_seconds: None,
        };
        assert!(valid.validate().is_ok());

        let not_a_url = CreateUrlRequest {
            original: "example".to_string(),
            duration_seconds: None,
        };
        assert!(not_a_url.validate().is_err());

        let too_long = CreateUrlRequest {
            original: "https://example.com".to_string(),
            duration_seconds: Some(MAX_DURATION_SECONDS + 1),
        };
        assert!(too_long.validate().is_err());

        // Non-positive durations are resolved by the service.
        let negative = ProlongUrlRequest {
            duration_seconds: -1,
        };
        assert!(negative.validate().is_ok());
    }
}
