//! Error types for bizval-service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bizval_common::ValidationError;
use serde::Serialize;

/// HTTP-facing service errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Valuation not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Common(#[from] bizval_common::Error),
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "VALUATION_NOT_FOUND"),
            Self::Common(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let code = match err.root() {
                    bizval_common::Error::Storage(_) => "STORAGE_ERROR",
                    _ => "INTERNAL_ERROR",
                };
                (status, code)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = serde_json::json!({
            "success": false,
            "error": ApiError {
                code: code.to_string(),
                message: self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::NotFound("abc123".to_string());
        assert_eq!(err.to_string(), "Valuation not found: abc123");
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err: ServiceError = ValidationError::MissingField {
            field: "email".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Missing required field: email");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err: ServiceError = bizval_common::Error::Storage("disk full".into()).into();
        assert_eq!(err.status_and_code(), (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"));
    }

    #[test]
    fn test_wrapped_storage_error_keeps_code() {
        let err: ServiceError = bizval_common::Error::Storage("x".into())
            .with_context("saving valuation")
            .into();
        assert_eq!(err.status_and_code(), (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"));
    }
}
