//! Credit timeline error types

use thiserror::Error;

/// Errors from the notice-fetch collaborator
#[derive(Error, Debug)]
pub enum CreditsError {
    #[error("Notice service unavailable")]
    Unavailable,

    #[error("Notice service request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notice service error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for credit operations
pub type CreditsResult<T> = Result<T, CreditsError>;
