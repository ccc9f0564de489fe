//! Generation request: the wire configuration and its validated domain form.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::aspect::AspectRatio;
use crate::duration::RequestedDuration;
use crate::error::{RequestError, RequestResult};
use crate::reference::{ReferenceTag, VarianceFactor};

/// Default dominant brand color.
pub const DEFAULT_PRIMARY_COLOR: &str = "#FE2C55";
/// Default accent brand color.
pub const DEFAULT_SECONDARY_COLOR: &str = "#25F4EE";

/// Maximum number of image variants per request.
pub const MAX_VARIANTS: u8 = 10;
/// Maximum number of anchor images passed to the video model.
pub const MAX_ANCHOR_IMAGES: usize = 3;

/// What kind of asset a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Image,
    Video,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Image => "image",
            GenerationMode::Video => "video",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(GenerationMode::Image),
            "video" => Ok(GenerationMode::Video),
            other => Err(RequestError::InvalidConfig(format!("Unknown mode: {}", other))),
        }
    }
}

/// How the creative-trend section is sourced, as sent by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum CreativeTrendType {
    Preset,
    #[serde(alias = "ai-generated", alias = "aiGenerated", alias = "ai_generated")]
    Ai,
    #[default]
    #[serde(alias = "none")]
    Skip,
}

/// Creative-trend selection after validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrendSelection {
    /// Look up a catalog preset by id.
    Preset { id: String },
    /// Expand a short user description into a creative direction.
    AiGenerated { description: String },
    /// No creative-trend section.
    #[default]
    Skip,
}

impl TrendSelection {
    /// Identifier echoed back in result metadata.
    pub fn identifier(&self) -> &str {
        match self {
            TrendSelection::Preset { id } => id,
            TrendSelection::AiGenerated { .. } => "ai-generated",
            TrendSelection::Skip => "none",
        }
    }
}

/// Configuration object posted by the studio UI (the `config` multipart field).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default)]
    pub mode: GenerationMode,

    #[serde(default)]
    pub creative_trend_type: CreativeTrendType,

    #[serde(default)]
    pub preset_id: Option<String>,

    #[serde(default, alias = "trendDescription")]
    #[validate(length(max = 2000))]
    pub ai_trend_description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 4000))]
    pub brand_guidelines: Option<String>,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub primary_color: Option<String>,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub secondary_color: Option<String>,

    /// "W:H"; defaults to 9:16.
    #[serde(default)]
    pub aspect_ratio: Option<String>,

    #[serde(default = "default_variant_count")]
    #[validate(range(min = 1, max = 10))]
    pub variant_count: u8,

    #[serde(default)]
    pub variance_factors: Vec<VarianceFactor>,

    #[serde(default, alias = "referenceImageInteraction")]
    #[validate(length(max = 2000))]
    pub reference_interaction: Option<String>,

    #[serde(default)]
    pub moodboard_image_count: usize,

    #[serde(default)]
    #[validate(length(max = 3))]
    pub reference_images: Vec<ReferenceTag>,

    #[serde(default)]
    #[validate(length(max = 4000))]
    pub narrative: Option<String>,

    #[serde(default)]
    pub narrative_template: Option<String>,

    /// Checked only for video requests without anchor images.
    #[serde(default)]
    pub duration: Option<RequestedDuration>,
}

fn default_variant_count() -> u8 {
    1
}

/// Brand inputs shared by both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandKit {
    pub guidelines: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for BrandKit {
    fn default() -> Self {
        Self {
            guidelines: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
        }
    }
}

/// Image-only options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub variant_count: u8,
    pub variance_factors: Vec<VarianceFactor>,
    pub reference_interaction: Option<String>,
    /// Advisory count from the UI; the dispatcher prefers the attachments.
    pub moodboard_image_count: usize,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            variant_count: 1,
            variance_factors: Vec::new(),
            reference_interaction: None,
            moodboard_image_count: 0,
        }
    }
}

/// Video-only options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoOptions {
    pub references: Vec<ReferenceTag>,
    pub narrative: String,
    pub narrative_template: Option<String>,
    pub requested_duration: Option<RequestedDuration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOptions {
    Image(ImageOptions),
    Video(VideoOptions),
}

/// A validated generation request. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub trend: TrendSelection,
    pub brand: BrandKit,
    pub aspect_ratio: AspectRatio,
    pub options: ModeOptions,
}

impl GenerationRequest {
    /// Parse and validate the JSON `config` payload.
    pub fn from_json(raw: &str) -> RequestResult<Self> {
        if raw.trim().is_empty() {
            return Err(RequestError::MissingConfig);
        }
        let config: GenerationConfig = serde_json::from_str(raw)
            .map_err(|e| RequestError::InvalidConfig(e.to_string()))?;
        Self::try_from(config)
    }

    pub fn mode(&self) -> GenerationMode {
        match self.options {
            ModeOptions::Image(_) => GenerationMode::Image,
            ModeOptions::Video(_) => GenerationMode::Video,
        }
    }

    pub fn image_options(&self) -> Option<&ImageOptions> {
        match &self.options {
            ModeOptions::Image(options) => Some(options),
            ModeOptions::Video(_) => None,
        }
    }

    pub fn video_options(&self) -> Option<&VideoOptions> {
        match &self.options {
            ModeOptions::Video(options) => Some(options),
            ModeOptions::Image(_) => None,
        }
    }
}

impl TryFrom<GenerationConfig> for GenerationRequest {
    type Error = RequestError;

    fn try_from(config: GenerationConfig) -> RequestResult<Self> {
        config
            .validate()
            .map_err(|e| RequestError::Validation(e.to_string()))?;

        let mode = config.mode;
        let aspect_ratio: AspectRatio = match non_blank(config.aspect_ratio) {
            Some(raw) => raw.parse()?,
            None => AspectRatio::default(),
        };
        if !aspect_ratio.is_supported_for(mode) {
            return Err(RequestError::UnsupportedAspectRatio {
                ratio: aspect_ratio.to_string(),
                mode,
            });
        }

        let trend = match config.creative_trend_type {
            CreativeTrendType::Preset => match non_blank(config.preset_id) {
                Some(id) => TrendSelection::Preset { id },
                None => TrendSelection::Skip,
            },
            CreativeTrendType::Ai => match non_blank(config.ai_trend_description) {
                Some(description) => TrendSelection::AiGenerated { description },
                None => TrendSelection::Skip,
            },
            CreativeTrendType::Skip => TrendSelection::Skip,
        };

        let brand = BrandKit {
            guidelines: non_blank(config.brand_guidelines),
            primary_color: non_blank(config.primary_color)
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
            secondary_color: non_blank(config.secondary_color)
                .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string()),
        };

        let options = match mode {
            GenerationMode::Image => {
                let mut factors = Vec::with_capacity(config.variance_factors.len());
                for factor in config.variance_factors {
                    if !factors.contains(&factor) {
                        factors.push(factor);
                    }
                }
                ModeOptions::Image(ImageOptions {
                    variant_count: config.variant_count,
                    variance_factors: factors,
                    reference_interaction: non_blank(config.reference_interaction),
                    moodboard_image_count: config.moodboard_image_count,
                })
            }
            GenerationMode::Video => {
                let narrative =
                    non_blank(config.narrative).ok_or(RequestError::MissingNarrative)?;
                ModeOptions::Video(VideoOptions {
                    references: config.reference_images,
                    narrative,
                    narrative_template: non_blank(config.narrative_template),
                    requested_duration: config.duration,
                })
            }
        };

        Ok(Self {
            trend,
            brand,
            aspect_ratio,
            options,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
