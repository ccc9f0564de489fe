//! Inputs and outputs of the generation client.

use vstudio_models::{AspectRatio, ClipDuration};

/// An image sent to the model as visual context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Media returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One image generation call.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    /// Product/reference images first, then moodboard images.
    pub reference_images: Vec<ImageInput>,
    pub aspect_ratio: AspectRatio,
    pub count: u8,
}

/// One video generation call.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompt: String,
    /// At most three anchor images.
    pub anchor_images: Vec<ImageInput>,
    /// Effective duration; must match the prompt text.
    pub duration: ClipDuration,
    pub aspect_ratio: AspectRatio,
}
