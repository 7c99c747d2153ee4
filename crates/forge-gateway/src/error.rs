//! Gateway error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// API-boundary errors, rendered as JSON `{error: {code, message}}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No platform credentials are configured.
    #[error("platform credentials not configured")]
    Unauthorized,

    /// Unknown deployment id, or a deployment not yet in a queryable state.
    #[error("{0}")]
    NotFound(String),

    /// Anything that failed past the boundary. The message is the error's
    /// Display text: detail enough for the operator without a backtrace.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIALS_MISSING",
                self.to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
