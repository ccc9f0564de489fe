//! Request validation errors.

use thiserror::Error;

use crate::aspect::AspectRatioParseError;
use crate::request::GenerationMode;

pub type RequestResult<T> = Result<T, RequestError>;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Missing generation configuration")]
    MissingConfig,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Aspect ratio {ratio} is not supported for {mode} generation")]
    UnsupportedAspectRatio { ratio: String, mode: GenerationMode },

    #[error("Invalid aspect ratio: {0}")]
    AspectRatio(#[from] AspectRatioParseError),

    #[error("A narrative is required for video generation")]
    MissingNarrative,
}
