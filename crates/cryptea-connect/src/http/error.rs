/*
[INPUT]:  Error sources (HTTP, API, signing, storage, serialization)
[OUTPUT]: Structured error types with user-facing message mapping
[POS]:    Error handling layer - unified error type for the entire crate
[UPDATE]: When adding new error sources or changing user-facing strings
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Cryptea auth adapter
#[derive(Error, Debug)]
pub enum CrypteaError {
    /// HTTP transport failed (unreachable backend, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-2xx status
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Wallet signing failed: empty signature, user rejection, or a
    /// provider exception. All collapsed into one retryable category.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Wallet relay transport failed or the peer dropped
    #[error("Wallet relay error: {0}")]
    Relay(String),

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Durable storage read or write failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrypteaError {
    /// Check if the error is retryable from the caller's point of view
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrypteaError::Http(_)
                | CrypteaError::Api { .. }
                | CrypteaError::SigningFailed(_)
                | CrypteaError::Relay(_)
                | CrypteaError::MalformedResponse(_)
        )
    }

    /// Human-readable string safe to surface in UI code.
    ///
    /// Signing problems and credential/transport problems each collapse
    /// to a single message so provider and transport detail never leaks
    /// to the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            CrypteaError::SigningFailed(_) | CrypteaError::Relay(_) => {
                "Something went wrong, please try again"
            }
            _ => "Invalid Login Details",
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        CrypteaError::Api {
            code: i32::from(status.as_u16()),
            message: message.into(),
        }
    }
}

/// Result type alias for Cryptea operations
pub type Result<T> = std::result::Result<T, CrypteaError>;
