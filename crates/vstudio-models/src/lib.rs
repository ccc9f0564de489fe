//! Shared data models for the VStudio generation backend.
//!
//! This crate provides Serde-serializable types for:
//! - The studio's generation configuration and its validated request form
//! - Aspect ratios, clip durations and reference image tags
//! - Per-variant variation specs
//! - Progress stream events

pub mod aspect;
pub mod duration;
pub mod error;
pub mod progress;
pub mod reference;
pub mod request;
pub mod variation;

// Re-export common types
pub use aspect::{AspectRatio, AspectRatioParseError};
pub use duration::{ClipDuration, DurationParseError, RequestedDuration};
pub use error::{RequestError, RequestResult};
pub use progress::{
    GeneratedAsset, ImageResultMetadata, ProgressEvent, ResultMetadata, ResultPayload,
    VideoResultMetadata,
};
pub use reference::{ReferencePurpose, ReferenceTag, VarianceFactor};
pub use request::{
    BrandKit, CreativeTrendType, GenerationConfig, GenerationMode, GenerationRequest,
    ImageOptions, ModeOptions, TrendSelection, VideoOptions, DEFAULT_PRIMARY_COLOR,
    DEFAULT_SECONDARY_COLOR, MAX_ANCHOR_IMAGES, MAX_VARIANTS,
};
pub use variation::VariationSpec;
