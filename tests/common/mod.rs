#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tiny_url::application::services::auth_service::hash_token;
use tiny_url::application::services::{AuthService, UrlService, UrlSettings};
use tiny_url::domain::entities::OwnerId;
use tiny_url::domain::repositories::TokenRepository;
use tiny_url::infrastructure::cache::{CacheService, MemoryCache};
use tiny_url::infrastructure::persistence::{MemoryTokenRepository, MemoryUrlRepository};
use tiny_url::routes::router;
use tiny_url::state::AppState;
use tiny_url::utils::{ManualClock, Sha256Encoder};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://s.example.com";

pub const ALICE_AUTH: &str = "Bearer alice-token";
pub const BOB_AUTH: &str = "Bearer bob-token";

/// A server over in-memory backends, with handles to drive and inspect them.
pub struct TestApp {
    pub server: TestServer,
    pub clock: ManualClock,
    pub store: Arc<MemoryUrlRepository>,
    pub cache: Arc<MemoryCache>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(UrlSettings::default()).await
}

pub async fn spawn_app_with(settings: UrlSettings) -> TestApp {
    spawn_app_with_cache(settings, None).await
}

/// Builds the app; `cache_override` replaces the in-memory cache the
/// service talks to (the returned `cache` handle is then unused).
pub async fn spawn_app_with_cache(
    settings: UrlSettings,
    cache_override: Option<Arc<dyn CacheService>>,
) -> TestApp {
    let clock = ManualClock::default();
    let store = Arc::new(MemoryUrlRepository::new());
    let cache = Arc::new(MemoryCache::new(settings.cache_ttl, Arc::new(clock.clone())));
    let service_cache: Arc<dyn CacheService> = match cache_override {
        Some(cache) => cache,
        None => cache.clone(),
    };

    let url_service = Arc::new(UrlService::new(
        store.clone(),
        service_cache,
        Arc::new(Sha256Encoder::new()),
        Arc::new(clock.clone()),
        settings,
    ));

    let tokens = Arc::new(MemoryTokenRepository::new());
    for owner in ["alice", "bob"] {
        tokens
            .create_token(
                owner,
                &OwnerId::new(owner),
                &hash_token(SIGNING_SECRET, &format!("{owner}-token")),
            )
            .await
            .unwrap();
    }
    let auth_service = Arc::new(AuthService::new(tokens, SIGNING_SECRET.to_string()));

    let state = AppState::new(url_service, auth_service, BASE_URL);
    let server = TestServer::new(router(state, Duration::from_secs(5))).unwrap();

    TestApp {
        server,
        clock,
        store,
        cache,
    }
}

/// Polls `condition` until it holds, letting detached tasks run in between.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}
