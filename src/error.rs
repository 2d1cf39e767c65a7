//! Application error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Server-side failures are logged in full and reported to the client with
//! a generic message only.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "todo not found: 42"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Not Found  | 404 Not Found             |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body, path or query could not be bound.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Todo with the given ID does not exist (or was soft-deleted).
    #[error("todo not found: {0}")]
    TodoNotFound(i64),

    /// The bootstrap user that owns unassigned todos could not be found.
    #[error("default user '{0}' not found")]
    DefaultUserMissing(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::TodoNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::DefaultUserMissing(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::TodoNotFound(_) => StatusCode::NOT_FOUND,
            Self::DefaultUserMissing(_) | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the client.
    ///
    /// Client errors echo their detail; server errors are replaced with a
    /// fixed message so store internals never leave the process.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest(_) | Self::TodoNotFound(_) => self.to_string(),
            Self::DefaultUserMissing(_) => "default user is not provisioned".to_string(),
            Self::Persistence(_) => "internal storage error".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
            },
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::TodoNotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DefaultUserMissing("defaultuser".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Persistence("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn persistence_detail_is_not_exposed() {
        let err = AppError::Persistence("connection refused to 10.0.0.5:5432".into());
        let message = err.public_message();
        assert_eq!(message, "internal storage error");
        assert!(!message.contains("10.0.0.5"));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = AppError::TodoNotFound(42);
        assert_eq!(err.public_message(), "todo not found: 42");
        assert_eq!(err.error_code(), 2001);
    }

    #[tokio::test]
    async fn response_body_has_error_envelope() {
        let response = AppError::InvalidRequest("expected value".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(json) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body is not json");
        };
        assert_eq!(json["error"]["code"], 1001);
        assert_eq!(json["error"]["message"], "invalid request: expected value");
    }
}
