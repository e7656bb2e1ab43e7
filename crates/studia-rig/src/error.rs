//! Error types for studia-rig.

use std::fmt;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during generation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Provider error (API call failed, rate limited, etc.)
    #[error("provider error: {provider}: {message}")]
    Provider {
        /// Provider name, e.g. `gemini`.
        provider: String,
        /// Error message from the provider.
        message: String,
    },

    /// Agent execution error.
    #[error("agent error: {0}")]
    Agent(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an agent error.
    pub fn agent(message: impl fmt::Display) -> Self {
        Self::Agent(message.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<rig::completion::PromptError> for Error {
    fn from(err: rig::completion::PromptError) -> Self {
        Self::provider("gemini", err)
    }
}

impl From<rig::completion::CompletionError> for Error {
    fn from(err: rig::completion::CompletionError) -> Self {
        Self::provider("gemini", err)
    }
}
