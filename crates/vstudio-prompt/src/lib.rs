//! Prompt assembly for the VStudio generation backend.
//!
//! Everything in this crate is pure: the same inputs always render the same
//! text. Network calls that feed it (trend expansion, variation specs) live in
//! `vstudio-pipeline`.

pub mod expansion;
pub mod image;
pub mod presets;
pub mod sections;
pub mod trend;
pub mod variation;
pub mod video;

pub use expansion::trend_expansion_prompt;
pub use image::{build_image_prompt, build_variant_prompt, composition_hint, ImagePromptParams};
pub use presets::{image_catalog, video_catalog, PresetCatalog, TrendPreset};
pub use sections::{PromptBuilder, SECTION_SEPARATOR};
pub use trend::resolve_trend_text;
pub use variation::{
    fallback_spec, fallback_specs, normalize_specs, parse_variation_specs, strip_code_fence,
    variants_needed, variation_request_prompt,
};
pub use video::{build_video_prompt, VideoPromptParams};
