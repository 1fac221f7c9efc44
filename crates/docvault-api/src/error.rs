//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use docvault_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error category.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// HTTP status for an error category.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized | ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorKind::DuplicateEmail => StatusCode::CONFLICT,
        ErrorKind::MissingInput | ErrorKind::InvalidDate | ErrorKind::Validation => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::LocalCleanupFailed | ErrorKind::Configuration | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<AppError> for ApiErrorResponse {
    fn from(err: AppError) -> Self {
        Self {
            error: err.kind.to_string(),
            message: err.message,
        }
    }
}

/// Newtype so handlers can return `AppError` across the crate boundary.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err, source = ?err.source, "Request failed");
        }

        (status, Json(ApiErrorResponse::from(err))).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
