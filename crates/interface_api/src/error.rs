//! API error handling
//!
//! Every failure leaves the service as `{"code": ..., "message": ...}` with
//! the HTTP status matching the code.

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use domain_billing::{BillingError, ErrorKind};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The RPC status code carried in the body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::FailedPrecondition(_) => "FAILED_PRECONDITION",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::FailedPrecondition(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::InvalidArgument(msg)
            | ApiError::NotFound(msg)
            | ApiError::FailedPrecondition(msg)
            | ApiError::Internal(msg) => msg,
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::InvalidArgument => ApiError::InvalidArgument(message),
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::FailedPrecondition => ApiError::FailedPrecondition(message),
            ErrorKind::Internal => ApiError::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(format!("invalid request body: {}", rejection.body_text()))
    }
}

/// Turns a handler panic into an `INTERNAL` response
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Handler panicked");

    ApiError::Internal("internal error while processing the request".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_error_kinds_map_to_statuses() {
        let cases = [
            (BillingError::invalid_argument("x"), StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            (BillingError::not_found("x"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (BillingError::failed_precondition("x"), StatusCode::CONFLICT, "FAILED_PRECONDITION"),
            (BillingError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        ];

        for (err, status, code) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn test_message_is_carried_without_prefix() {
        let api = ApiError::from(BillingError::not_found("bill not found"));
        assert!(matches!(api, ApiError::NotFound(ref m) if m == "bill not found"));
    }

    #[test]
    fn test_panic_response_is_internal() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
