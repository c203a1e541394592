//! Query error types
//!
//! Errors raised while assembling queries or talking to the GraphQL gateway.

use thiserror::Error;

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// Field name not in the transaction schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Query could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Gateway could not be reached
    #[error("Gateway unavailable")]
    Unavailable,

    /// Gateway did not answer in time
    #[error("Gateway request timeout")]
    Timeout,

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gateway returned a non-success status
    #[error("Gateway error {status}: {message}")]
    Gateway { status: u16, message: String },

    /// Gateway answered with GraphQL errors and no data
    #[error("GraphQL error: {0}")]
    Graphql(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
