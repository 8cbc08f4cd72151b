//! Error types for the Glimmer client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Glimmer client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The backend rejected the bearer token (or none was sent)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// API returned an error status code
    #[error("{message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Message decoded from the response body
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Credential storage could not be read or written
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Create an error from a non-2xx status and its decoded message
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 401 {
            Self::Unauthorized(message)
        } else {
            Self::ApiError { status, message }
        }
    }

    /// Whether the session is unusable and the user must log in again
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }
}
