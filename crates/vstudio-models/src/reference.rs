//! Reference image tags and variance factors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a video anchor image represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReferencePurpose {
    Character,
    Product,
    Environment,
    Keyframe,
    #[serde(alias = "styleGuide", alias = "style_guide")]
    StyleGuide,
    #[default]
    Custom,
}

impl ReferencePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferencePurpose::Character => "character",
            ReferencePurpose::Product => "product",
            ReferencePurpose::Environment => "environment",
            ReferencePurpose::Keyframe => "keyframe",
            ReferencePurpose::StyleGuide => "style-guide",
            ReferencePurpose::Custom => "custom",
        }
    }

    /// Human label used in the video prompt.
    pub fn label(&self) -> &'static str {
        match self {
            ReferencePurpose::Character => "Main character/subject",
            ReferencePurpose::Product => "Product to be featured",
            ReferencePurpose::Environment => "Brand environment/location",
            ReferencePurpose::Keyframe => "Key visual moment/keyframe",
            ReferencePurpose::StyleGuide => "Visual style guide",
            ReferencePurpose::Custom => "Custom reference",
        }
    }
}

impl fmt::Display for ReferencePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Purpose tag attached to one video anchor image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTag {
    #[serde(default)]
    pub purpose: ReferencePurpose,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
}

impl ReferenceTag {
    pub fn new(purpose: ReferencePurpose) -> Self {
        Self {
            purpose,
            custom_description: None,
        }
    }

    pub fn custom(description: impl Into<String>) -> Self {
        Self {
            purpose: ReferencePurpose::Custom,
            custom_description: Some(description.into()),
        }
    }

    /// Label for the prompt. Custom tags use their description when one was given.
    pub fn label(&self) -> String {
        match (self.purpose, self.custom_description.as_deref().map(str::trim)) {
            (ReferencePurpose::Custom, Some(desc)) if !desc.is_empty() => desc.to_string(),
            (purpose, _) => purpose.label().to_string(),
        }
    }
}

/// Dimension along which image variants may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VarianceFactor {
    Lighting,
    Environment,
    #[serde(alias = "cameraAngle", alias = "camera_angle")]
    CameraAngle,
    Materials,
}

impl VarianceFactor {
    /// Canonical order, also the order fields appear in prompts.
    pub const ALL: &'static [VarianceFactor] = &[
        VarianceFactor::Lighting,
        VarianceFactor::Environment,
        VarianceFactor::CameraAngle,
        VarianceFactor::Materials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VarianceFactor::Lighting => "lighting",
            VarianceFactor::Environment => "environment",
            VarianceFactor::CameraAngle => "camera-angle",
            VarianceFactor::Materials => "materials",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VarianceFactor::Lighting => "Lighting",
            VarianceFactor::Environment => "Environment",
            VarianceFactor::CameraAngle => "Camera angle",
            VarianceFactor::Materials => "Materials",
        }
    }
}

impl fmt::Display for VarianceFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VarianceFactor {
    type Err = VarianceFactorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lighting" => Ok(VarianceFactor::Lighting),
            "environment" => Ok(VarianceFactor::Environment),
            "camera-angle" | "cameraangle" => Ok(VarianceFactor::CameraAngle),
            "materials" => Ok(VarianceFactor::Materials),
            _ => Err(VarianceFactorParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown variance factor: {0}")]
pub struct VarianceFactorParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_labels() {
        assert_eq!(
            ReferenceTag::new(ReferencePurpose::Product).label(),
            "Product to be featured"
        );
        assert_eq!(
            ReferenceTag::custom("Founder portrait").label(),
            "Founder portrait"
        );
        assert_eq!(
            ReferenceTag::custom("   ").label(),
            ReferencePurpose::Custom.label()
        );
    }

    #[test]
    fn test_reference_tag_wire_format() {
        let tag: ReferenceTag =
            serde_json::from_str(r#"{"purpose":"style-guide"}"#).unwrap();
        assert_eq!(tag.purpose, ReferencePurpose::StyleGuide);

        let tag: ReferenceTag =
            serde_json::from_str(r#"{"purpose":"custom","customDescription":"Mascot"}"#).unwrap();
        assert_eq!(tag.label(), "Mascot");
    }

    #[test]
    fn test_variance_factor_parse() {
        assert_eq!(
            "camera_angle".parse::<VarianceFactor>().unwrap(),
            VarianceFactor::CameraAngle
        );
        assert_eq!(
            "cameraAngle".parse::<VarianceFactor>().unwrap(),
            VarianceFactor::CameraAngle
        );
        assert!("texture".parse::<VarianceFactor>().is_err());

        let parsed: Vec<VarianceFactor> =
            serde_json::from_str(r#"["lighting","camera-angle","cameraAngle"]"#).unwrap();
        assert_eq!(parsed.len(), 3);
    }
}
