//! Handlers for owner-scoped short URL management.
//!
//! Every handler runs behind [`crate::api::middleware::auth`], which puts the
//! caller's [`OwnerId`] into the request extensions.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Duration;
use validator::Validate;

use crate::api::dto::urls::{CreateUrlRequest, ProlongUrlRequest, UrlListResponse, UrlResponse};
use crate::domain::entities::{OwnerId, ShortUrl};
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, url: ShortUrl) -> UrlResponse {
    let short_url = state.short_url(&url.alias);
    UrlResponse::new(url, short_url)
}

/// Lists the caller's live short URLs.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<UrlListResponse>, AppError> {
    let urls = state.url_service.list_by_owner(&owner).await?;

    let items: Vec<UrlResponse> = urls
        .into_iter()
        .map(|url| to_response(&state, url))
        .collect();

    Ok(Json(UrlListResponse {
        total: items.len(),
        items,
    }))
}

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "original": "https://example.com/some/long/path",
///   "duration_seconds": 3600
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if validation fails
/// - 409 Conflict if the caller already has a live short URL for `original`
/// - 422 Unprocessable Entity if the caller reached the short URL limit
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    // Non-positive requests select the default lifetime.
    let duration = Duration::seconds(payload.duration_seconds.unwrap_or(0).max(0));
    let url = state
        .url_service
        .create(&payload.original, &owner, duration)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, url))))
}

/// Returns one of the caller's short URLs.
///
/// # Endpoint
///
/// `GET /api/urls/{alias}`
pub async fn get_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(alias): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let url = state.url_service.get_by_owner(&alias, &owner).await?;

    Ok(Json(to_response(&state, url)))
}

/// Extends the lifetime of one of the caller's short URLs.
///
/// # Endpoint
///
/// `PATCH /api/urls/{alias}/prolong`
///
/// The new deadline is the old deadline plus `duration_seconds`.
pub async fn prolong_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(alias): Path<String>,
    Json(payload): Json<ProlongUrlRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    payload.validate()?;

    let url = state
        .url_service
        .prolong(
            &alias,
            &owner,
            Duration::seconds(payload.duration_seconds.max(0)),
        )
        .await?;

    Ok(Json(to_response(&state, url)))
}

/// Deletes one of the caller's short URLs.
///
/// # Endpoint
///
/// `DELETE /api/urls/{alias}`
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerId>,
    Path(alias): Path<String>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete(&alias, &owner).await?;

    Ok(StatusCode::NO_CONTENT)
}
