//! Generation client for the VStudio backend.
//!
//! [`GenerationClient`] is the boundary the pipeline talks to;
//! [`GeminiClient`] implements it against the Gemini and Veo REST APIs.

pub mod client;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod types;

pub use client::GenerationClient;
pub use config::GenAiConfig;
pub use error::{GenAiError, GenAiResult};
pub use gemini::GeminiClient;
pub use types::{GeneratedMedia, ImageInput, ImageRequest, VideoRequest};
