//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_url_handler, delete_url_handler, get_url_handler, list_urls_handler,
    prolong_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /urls`                 - List the caller's live short URLs
/// - `POST   /urls`                 - Create a short URL
/// - `GET    /urls/{alias}`         - Fetch one of the caller's short URLs
/// - `DELETE /urls/{alias}`         - Delete one of the caller's short URLs
/// - `PATCH  /urls/{alias}/prolong` - Extend a short URL's lifetime
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route(
            "/urls/{alias}",
            get(get_url_handler).delete(delete_url_handler),
        )
        .route("/urls/{alias}/prolong", patch(prolong_url_handler))
}
