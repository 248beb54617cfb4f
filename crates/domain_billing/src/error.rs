//! Billing domain errors
//!
//! Every failure a caller can observe is one of four kinds. Infrastructure
//! faults never cross the domain boundary as-is; they are collapsed into
//! [`BillingError::Internal`] with a generic message.

use thiserror::Error;

/// Classification of a billing failure, independent of the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed, missing, or out-of-range input
    InvalidArgument,
    /// No matching non-deleted bill
    NotFound,
    /// Valid request against a bill in the wrong state
    FailedPrecondition,
    /// Unexpected store or runtime fault
    Internal,
}

/// Errors that can occur in the billing domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        BillingError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        BillingError::NotFound(message.into())
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        BillingError::FailedPrecondition(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        BillingError::Internal(message.into())
    }

    /// Returns the error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            BillingError::NotFound(_) => ErrorKind::NotFound,
            BillingError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            BillingError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the caller-facing message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            BillingError::InvalidArgument(msg)
            | BillingError::NotFound(msg)
            | BillingError::FailedPrecondition(msg)
            | BillingError::Internal(msg) => msg,
        }
    }
}
