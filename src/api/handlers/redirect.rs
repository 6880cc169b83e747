//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its original URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Request Flow
///
/// 1. Check cache for the alias
/// 2. On cache miss (or cache error), query database
/// 3. Asynchronously refill the cache
/// 4. Return 301 Moved Permanently
///
/// # Errors
///
/// Returns 404 Not Found if the alias doesn't exist.
/// Returns 410 Gone if the short URL has expired.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.url_service.get(&alias).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, url.original)],
    ))
}
