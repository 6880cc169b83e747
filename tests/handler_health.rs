mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tiny_url::application::services::UrlSettings;
use tiny_url::domain::entities::ShortUrl;
use tiny_url::infrastructure::cache::{CacheError, CacheResult, CacheService};

/// A cache whose backend is always down.
struct DownCache;

#[async_trait]
impl CacheService for DownCache {
    async fn get_url(&self, _alias: &str) -> CacheResult<Option<ShortUrl>> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn set_url(
        &self,
        _alias: &str,
        _url: &ShortUrl,
        _ttl: Option<Duration>,
    ) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn invalidate(&self, _alias: &str) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn test_health_check_healthy() {
    let app = common::spawn_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_check_degraded_cache() {
    let app = common::spawn_app_with_cache(UrlSettings::default(), Some(Arc::new(DownCache))).await;

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}

#[tokio::test]
async fn test_redirect_survives_cache_outage() {
    let app = common::spawn_app_with_cache(UrlSettings::default(), Some(Arc::new(DownCache))).await;

    let created = app
        .server
        .post("/api/urls")
        .add_header("Authorization", common::ALICE_AUTH)
        .json(&serde_json::json!({ "original": "https://example.com" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let alias = created.json::<Value>()["alias"].as_str().unwrap().to_string();

    let response = app.server.get(&format!("/{alias}")).await;

    assert_eq!(response.status_code(), 301);
    assert_eq!(response.header("location"), "https://example.com");
}
