//! Error types for schoolops-import
//!
//! Import failures keep their structured `errorKind` body; other API errors
//! use the `{ "error": { code, message } }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::import::ImportError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Import rejected by the pipeline
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// HTTP status for an import failure
pub fn import_status(err: &ImportError) -> StatusCode {
    match err {
        ImportError::MissingRequiredField { .. } | ImportError::InvalidReference { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ImportError::ValueTooLong { .. } => StatusCode::BAD_REQUEST,
        ImportError::DuplicateEntry { .. } | ImportError::ReferenceViolation { .. } => {
            StatusCode::CONFLICT
        }
        ImportError::UnknownCommitFailure { .. } | ImportError::LookupFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Import(err) => {
                return (import_status(&err), Json(err)).into_response();
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
