//! Pipeline error types.

use thiserror::Error;
use vstudio_genai::GenAiError;
use vstudio_models::RequestError;

pub type PipelineResult<T> = Result<T, PipelineError>;

const STORAGE_FAILED: &str = "Failed to store generated media";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] RequestError),

    #[error("Image generation failed: {0}")]
    ImageGeneration(#[source] GenAiError),

    #[error("Video generation failed: {0}")]
    VideoGeneration(#[source] GenAiError),

    #[error("Failed to store generated media: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Text for the terminal error event.
    ///
    /// Generation failures carry the provider's own message when there is
    /// one, otherwise a generic message naming the operation. Storage
    /// details stay in the server log.
    pub fn user_message(&self) -> String {
        match self {
            Self::ImageGeneration(e) => e
                .provider_message()
                .unwrap_or_else(|| "Image generation failed".to_string()),
            Self::VideoGeneration(e) => e
                .provider_message()
                .unwrap_or_else(|| "Video generation failed".to_string()),
            Self::Storage(_) | Self::Io(_) => STORAGE_FAILED.to_string(),
            Self::Config(e) => e.to_string(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_fallbacks() {
        let err = PipelineError::ImageGeneration(GenAiError::RequestFailed {
            status: 500,
            message: String::new(),
        });
        assert_eq!(err.user_message(), "Image generation failed");

        let err = PipelineError::VideoGeneration(GenAiError::RequestFailed {
            status: 500,
            message: String::new(),
        });
        assert_eq!(err.user_message(), "Video generation failed");

        let err = PipelineError::ImageGeneration(GenAiError::NoImageContent);
        assert_eq!(err.user_message(), "No image content in provider response");
    }

    #[test]
    fn test_config_message() {
        let err = PipelineError::from(RequestError::MissingConfig);
        assert!(err.is_config());
        assert_eq!(err.user_message(), "Missing generation configuration");
    }

    #[test]
    fn test_storage_message_hides_paths() {
        let err = PipelineError::storage("/srv/media/abc.png: Permission denied");
        assert_eq!(err.user_message(), "Failed to store generated media");
        assert!(err.to_string().contains("/srv/media"));

        let err = PipelineError::from(std::io::Error::other("/srv/media: read-only"));
        assert_eq!(err.user_message(), "Failed to store generated media");
    }
}
