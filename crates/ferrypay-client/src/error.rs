//! Client error types.

use ferrypay_core::{SigningError, ValidationError};

/// Errors that can occur when calling the payment processor.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request payload failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request payload could not be signed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
