//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, UrlService};

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub auth_service: Arc<AuthService>,
    /// Public prefix of short links, without a trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService>,
        auth_service: Arc<AuthService>,
        base_url: &str,
    ) -> Self {
        Self {
            url_service,
            auth_service,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Full public link for `alias`.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.base_url, alias)
    }
}
