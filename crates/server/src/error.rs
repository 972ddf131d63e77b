use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// The only error kinds the HTTP boundary surfaces directly (spec.md §7);
/// everything else (decode/persist/render failures) is recorded as missing
/// derived state, not as an HTTP error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed")]
    AuthFailed,
    #[error("rate limited")]
    RateLimited,
    #[error("request rejected: {0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("operation timed out")]
    TimedOut,
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::AuthFailed => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
