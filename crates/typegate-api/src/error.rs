//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine and registry errors to HTTP status codes with JSON error
//! bodies. Constraint violations never pass through here — a failed
//! validation is a 200 with `success: false`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use typegate_engine::resolver::ResolveError;
use typegate_engine::validate::ValidateError;
use typegate_registry_client::RegistryError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-input problem (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Page size must be a positive integer (400).
    #[error("invalid pageSize: must be a positive integer")]
    InvalidPageSize,

    /// The requested resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Registry credential missing or rejected (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The remote registry failed or is unreachable (502).
    #[error("upstream registry error: {0}")]
    Upstream(String),

    /// Internal server error (500). Details are logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) | AppError::InvalidPageSize => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Unauthorized => AppError::Unauthorized(e.to_string()),
            RegistryError::NotFound { .. } => AppError::NotFound(e.to_string()),
            RegistryError::Status { .. }
            | RegistryError::Transport { .. }
            | RegistryError::Decode { .. } => AppError::Upstream(e.to_string()),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::InvalidName(_) | ResolveError::NotAMessage { .. } => {
                AppError::BadRequest(e.to_string())
            }
            ResolveError::NotFoundLocal { .. }
            | ResolveError::NotFoundRemote { .. }
            | ResolveError::NotFoundAnywhere { .. } => AppError::NotFound(e.to_string()),
            ResolveError::Registry(inner) => inner.into(),
        }
    }
}

impl From<ValidateError> for AppError {
    fn from(e: ValidateError) -> Self {
        match e {
            ValidateError::UnknownSchema { .. } | ValidateError::DecodeFailure(_) => {
                AppError::BadRequest(e.to_string())
            }
            ValidateError::Resolution(inner) => inner.into(),
        }
    }
}
