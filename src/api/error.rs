//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::credits::CreditsError;
use crate::delegation::DelegationError;
use crate::query::QueryError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query building or rendering error
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Credit timeline error
    #[error("Credits error: {0}")]
    Credits(#[from] CreditsError),

    /// Delegation service error
    #[error("Delegation error: {0}")]
    Delegation(#[from] DelegationError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable (dependency down or not loaded yet)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Query(QueryError::UnknownField(_)) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_FIELD")
            }
            ApiError::Query(QueryError::Serialization(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "QUERY_ERROR")
            }
            ApiError::Query(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
            ApiError::Credits(CreditsError::UnknownPaymentMethod(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_PAYMENT_METHOD")
            }
            ApiError::Credits(_) => (StatusCode::BAD_GATEWAY, "CREDITS_ERROR"),
            ApiError::Delegation(_) => (StatusCode::BAD_GATEWAY, "DELEGATION_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Query(QueryError::UnknownField("size".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Query(QueryError::Timeout), StatusCode::BAD_GATEWAY),
            (
                ApiError::Credits(CreditsError::UnknownPaymentMethod("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Delegation(DelegationError::Unavailable),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
