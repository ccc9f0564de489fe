//! Aspect ratio definitions and per-mode support tables.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::request::GenerationMode;

/// Aspect ratio specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Full-screen vertical (9:16), the native feed format.
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio {
        width: 1,
        height: 1,
    };

    /// Feed portrait (4:5)
    pub const FEED_PORTRAIT: AspectRatio = AspectRatio {
        width: 4,
        height: 5,
    };

    /// Widescreen (16:9)
    pub const LANDSCAPE: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Ratios accepted for image generation.
    pub const IMAGE_RATIOS: &'static [AspectRatio] = &[
        AspectRatio::PORTRAIT,
        AspectRatio::SQUARE,
        AspectRatio::FEED_PORTRAIT,
        AspectRatio::LANDSCAPE,
    ];

    /// Ratios accepted for video generation.
    pub const VIDEO_RATIOS: &'static [AspectRatio] = &[
        AspectRatio::PORTRAIT,
        AspectRatio::SQUARE,
        AspectRatio::LANDSCAPE,
    ];

    /// Create a new aspect ratio.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the ratio can be requested for the given mode.
    pub fn is_supported_for(&self, mode: GenerationMode) -> bool {
        let supported = match mode {
            GenerationMode::Image => Self::IMAGE_RATIOS,
            GenerationMode::Video => Self::VIDEO_RATIOS,
        };
        supported.contains(self)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 2 {
            return Err(AspectRatioParseError::InvalidFormat(s.to_string()));
        }

        let width = parts[0]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[0].to_string()))?;
        let height = parts[1]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[1].to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        Ok(AspectRatio { width, height })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

impl Serialize for AspectRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AspectRatioParseError {
    #[error("Invalid aspect ratio format: {0}, expected 'W:H'")]
    InvalidFormat(String),
    #[error("Invalid number in aspect ratio: {0}")]
    InvalidNumber(String),
    #[error("Aspect ratio cannot have zero values")]
    ZeroValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::PORTRAIT);
        assert_eq!(" 4 : 5 ".parse::<AspectRatio>().unwrap(), AspectRatio::FEED_PORTRAIT);
        assert_eq!(
            "0:1".parse::<AspectRatio>(),
            Err(AspectRatioParseError::ZeroValue)
        );
        assert!("16x9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_mode_support() {
        assert!(AspectRatio::FEED_PORTRAIT.is_supported_for(GenerationMode::Image));
        assert!(!AspectRatio::FEED_PORTRAIT.is_supported_for(GenerationMode::Video));
        assert!(AspectRatio::LANDSCAPE.is_supported_for(GenerationMode::Video));
        assert!(!AspectRatio::new(21, 9).is_supported_for(GenerationMode::Image));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&AspectRatio::LANDSCAPE).unwrap();
        assert_eq!(json, "\"16:9\"");
        let parsed: AspectRatio = serde_json::from_str("\"1:1\"").unwrap();
        assert_eq!(parsed, AspectRatio::SQUARE);
    }
}
