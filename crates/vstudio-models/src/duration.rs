//! Video clip durations and the reference-image duration lock.

use schemars::JsonSchema;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a generated video clip, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipDuration(u8);

impl ClipDuration {
    /// Longest clip the video model produces. Also the only length it accepts
    /// when reference images are attached.
    pub const MAX: ClipDuration = ClipDuration(8);

    /// Used when nothing was requested and no reference images are attached.
    pub const DEFAULT: ClipDuration = ClipDuration(6);

    /// Durations the video model accepts.
    pub const SUPPORTED: &'static [u8] = &[4, 6, 8];

    /// Create a duration, rejecting lengths the model does not support.
    pub fn new(seconds: u8) -> Result<Self, DurationParseError> {
        if Self::SUPPORTED.contains(&seconds) {
            Ok(Self(seconds))
        } else {
            Err(DurationParseError::Unsupported(seconds))
        }
    }

    pub fn seconds(&self) -> u8 {
        self.0
    }

    /// Effective duration for a video request.
    ///
    /// Anchor images lock the clip to [`ClipDuration::MAX`] regardless of what
    /// was requested. The result must be used for both the prompt text and the
    /// provider call.
    pub fn resolve(has_anchor_images: bool, requested: Option<ClipDuration>) -> ClipDuration {
        if has_anchor_images {
            Self::MAX
        } else {
            requested.unwrap_or(Self::DEFAULT)
        }
    }
}

impl Default for ClipDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl FromStr for ClipDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
        let seconds: u8 = digits
            .trim()
            .parse()
            .map_err(|_| DurationParseError::InvalidFormat(s.to_string()))?;
        Self::new(seconds)
    }
}

impl Serialize for ClipDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClipDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u8),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(seconds) => ClipDuration::new(seconds),
            Raw::Text(text) => text.parse(),
        }
        .map_err(de::Error::custom)
    }
}

/// Duration as sent by the client.
///
/// Kept unparsed on the wire: anchor images override it, so an unsupported
/// value only matters once the dispatcher knows none are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RequestedDuration {
    Seconds(u64),
    Text(String),
    Other(serde_json::Value),
}

impl RequestedDuration {
    /// Interpret the raw value as a supported clip length.
    pub fn to_clip(&self) -> Result<ClipDuration, DurationParseError> {
        match self {
            RequestedDuration::Seconds(seconds) => u8::try_from(*seconds)
                .map_err(|_| DurationParseError::InvalidFormat(seconds.to_string()))
                .and_then(ClipDuration::new),
            RequestedDuration::Text(text) => text.parse(),
            RequestedDuration::Other(value) => Err(DurationParseError::InvalidFormat(value.to_string())),
        }
    }
}

impl fmt::Display for RequestedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedDuration::Seconds(seconds) => write!(f, "{}", seconds),
            RequestedDuration::Text(text) => write!(f, "{}", text),
            RequestedDuration::Other(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("Invalid duration: {0}, expected e.g. '6s'")]
    InvalidFormat(String),
    #[error("Unsupported duration: {0}s (supported: 4s, 6s, 8s)")]
    Unsupported(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_images_force_max() {
        let requested = Some(ClipDuration::new(4).unwrap());
        assert_eq!(ClipDuration::resolve(true, requested), ClipDuration::MAX);
        assert_eq!(ClipDuration::resolve(true, None), ClipDuration::MAX);
    }

    #[test]
    fn test_requested_or_default_without_anchors() {
        let requested = Some(ClipDuration::new(4).unwrap());
        assert_eq!(ClipDuration::resolve(false, requested).to_string(), "4s");
        assert_eq!(ClipDuration::resolve(false, None).to_string(), "6s");
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("8s".parse::<ClipDuration>().unwrap(), ClipDuration::MAX);
        assert_eq!("6".parse::<ClipDuration>().unwrap(), ClipDuration::DEFAULT);
        assert_eq!(
            "5s".parse::<ClipDuration>(),
            Err(DurationParseError::Unsupported(5))
        );
        assert!("long".parse::<ClipDuration>().is_err());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let a: ClipDuration = serde_json::from_str("\"4s\"").unwrap();
        let b: ClipDuration = serde_json::from_str("4").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<ClipDuration>("12").is_err());
    }

    #[test]
    fn test_requested_duration_accepts_anything() {
        let ten: RequestedDuration = serde_json::from_str("\"10s\"").unwrap();
        assert_eq!(ten.to_clip(), Err(DurationParseError::Unsupported(10)));

        let four: RequestedDuration = serde_json::from_str("4").unwrap();
        assert_eq!(four.to_clip(), Ok(ClipDuration::new(4).unwrap()));

        let huge: RequestedDuration = serde_json::from_str("300").unwrap();
        assert!(matches!(huge.to_clip(), Err(DurationParseError::InvalidFormat(_))));

        let fraction: RequestedDuration = serde_json::from_str("6.5").unwrap();
        assert!(fraction.to_clip().is_err());
    }
}
