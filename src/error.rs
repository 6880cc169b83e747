//! HTTP-facing error type.
//!
//! Every handler returns [`AppError`], rendered as
//! `{"error": {"code", "message", "details"}}` with a matching status code.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::UrlError;
use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    Forbidden { message: String, details: Value },
    NotFound { message: String, details: Value },
    Gone { message: String, details: Value },
    Conflict { message: String, details: Value },
    Unprocessable { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn unprocessable(message: impl Into<String>, details: Value) -> Self {
        Self::Unprocessable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts into the serializable payload, consuming the error.
    pub fn to_error_info(self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Unauthorized { message, details } => ("unauthorized", message, details),
            AppError::Forbidden { message, details } => ("forbidden", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Gone { message, details } => ("gone", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Unprocessable { message, details } => {
                ("unprocessable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(body),
            )
                .into_response();
        }

        (status, Json(body)).into_response()
    }
}

impl From<UrlError> for AppError {
    fn from(e: UrlError) -> Self {
        match e {
            UrlError::AlreadyExists { alias } => AppError::conflict(
                "Short URL for this target already exists",
                json!({ "alias": alias }),
            ),
            UrlError::QuotaExceeded { limit } => AppError::unprocessable(
                "Short URL limit reached",
                json!({ "limit": limit }),
            ),
            UrlError::NoPossibleEncoding => {
                AppError::internal("Could not allocate a unique alias", json!({}))
            }
            UrlError::Encoding(e) => {
                tracing::error!(error = %e, "Alias encoding failed");
                AppError::internal("Alias encoding failed", json!({}))
            }
            UrlError::NotFound => AppError::not_found("Short URL not found", json!({})),
            UrlError::Expired => AppError::gone("Short URL has expired", json!({})),
            UrlError::Forbidden => {
                AppError::forbidden("Short URL belongs to another owner", json!({}))
            }
            UrlError::DurationOutOfRange => {
                AppError::bad_request("Expiration deadline is out of range", json!({}))
            }
            UrlError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Store error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::alias_encoder::EncodeError;

    #[test]
    fn test_url_error_status_mapping() {
        let cases = [
            (
                UrlError::AlreadyExists {
                    alias: "abc".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (UrlError::QuotaExceeded { limit: 3 }, StatusCode::UNPROCESSABLE_ENTITY),
            (UrlError::NoPossibleEncoding, StatusCode::INTERNAL_SERVER_ERROR),
            (
                UrlError::Encoding(EncodeError::InvalidLength),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (UrlError::NotFound, StatusCode::NOT_FOUND),
            (UrlError::Expired, StatusCode::GONE),
            (UrlError::Forbidden, StatusCode::FORBIDDEN),
            (UrlError::DurationOutOfRange, StatusCode::BAD_REQUEST),
            (
                UrlError::Store(StoreError::Backend("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).status_code(), status);
        }
    }

    #[test]
    fn test_error_info_carries_details() {
        let info = AppError::from(UrlError::AlreadyExists {
            alias: "NTVjYThl".to_string(),
        })
        .to_error_info();

        assert_eq!(info.code, "conflict");
        assert_eq!(info.details["alias"], "NTVjYThl");
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
