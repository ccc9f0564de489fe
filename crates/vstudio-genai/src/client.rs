//! The generation client boundary.

use async_trait::async_trait;

use crate::error::GenAiResult;
use crate::types::{GeneratedMedia, ImageRequest, VideoRequest};

/// External generation provider.
///
/// One process-wide instance is shared by all requests, so implementations
/// must not hold per-request state.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate plain text from a prompt.
    async fn generate_text(&self, prompt: &str) -> GenAiResult<String>;

    /// Generate one image. Fails when the provider returns no image.
    async fn generate_image(&self, request: ImageRequest) -> GenAiResult<GeneratedMedia>;

    /// Generate one video clip, waiting for the provider to finish.
    async fn generate_video(&self, request: VideoRequest) -> GenAiResult<GeneratedMedia>;
}
