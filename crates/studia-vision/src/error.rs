//! Error types for vision operations.

/// Result type for all vision operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur when talking to the Vision API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client errors (connection, timeout, etc.)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error response.
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP or Vision API status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// The API response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns whether this error indicates a transient failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::Api { status, .. } => matches!(*status, 429 | 500..=599),
            _ => false,
        }
    }
}
