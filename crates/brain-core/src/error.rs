//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur during brain processing.
#[derive(Debug, Clone, Error)]
pub enum BrainError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never got a response (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The upstream API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The upstream API rejected the request because of rate limiting.
    #[error("rate limited (retry after {retry_after:?}s): {body}")]
    RateLimited {
        /// Value of the `retry-after` header, if present.
        retry_after: Option<u64>,
        /// Raw response body.
        body: String,
    },

    /// A success response did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The message could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The brain has been shut down.
    #[error("brain shut down")]
    ShutDown,

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}

impl BrainError {
    /// HTTP status code associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BrainError::Api { status, .. } => Some(*status),
            BrainError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}
