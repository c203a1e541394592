//! Delegation error types

use thiserror::Error;

/// Errors from the delegation data source
#[derive(Error, Debug)]
pub enum DelegationError {
    #[error("Delegation service unavailable")]
    Unavailable,

    #[error("Delegation service request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Delegation service error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for delegation operations
pub type DelegationResult<T> = Result<T, DelegationError>;
