//! Generation client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for generation client operations.
pub type GenAiResult<T> = Result<T, GenAiError>;

/// Errors that can occur while talking to the model provider.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Failed to configure generation client: {0}")]
    ConfigError(String),

    #[error("Provider returned {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("No image content in provider response")]
    NoImageContent,

    #[error("No video content in provider response")]
    NoVideoContent,

    #[error("No text content in provider response")]
    NoTextContent,

    #[error("Video generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Video operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenAiError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Message suitable for the end user, if the error carries one.
    pub fn provider_message(&self) -> Option<String> {
        let message = match self {
            Self::RequestFailed { message, .. } | Self::OperationFailed(message) => message.clone(),
            other => other.to_string(),
        };
        let message = message.trim();
        (!message.is_empty()).then(|| message.to_string())
    }
}
