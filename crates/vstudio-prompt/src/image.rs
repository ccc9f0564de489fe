//! Image prompt assembly.
//!
//! Section order is fixed:
//! 1. Reference images interaction (with more than one reference image)
//! 2. Creative trend
//! 3. Brand guidelines
//! 4. Color palette
//! 5. Moodboard reference
//! 6. Image specifications
//! 7. Variation specifics (variants 2..N)

use vstudio_models::{AspectRatio, BrandKit, VariationSpec};

use crate::sections::{bullets, PromptBuilder};

pub const REFERENCE_INTERACTION_TITLE: &str = "REFERENCE IMAGES INTERACTION";
pub const CREATIVE_TREND_TITLE: &str = "CREATIVE TREND";
pub const BRAND_GUIDELINES_TITLE: &str = "BRAND GUIDELINES";
pub const COLOR_PALETTE_TITLE: &str = "COLOR PALETTE";
pub const MOODBOARD_TITLE: &str = "MOODBOARD REFERENCE";
pub const IMAGE_SPECIFICATIONS_TITLE: &str = "IMAGE SPECIFICATIONS";

const DEFAULT_BRAND_GUIDELINES: &str = "No specific brand guidelines were provided. Use a clean, modern, professional aesthetic suitable for a premium social media advertisement.";

const COMPOSITING_REQUIREMENTS: &[&str] = &[
    "Integrate every referenced element seamlessly into a single coherent scene",
    "Match lighting direction, color temperature and perspective across all elements",
    "Keep relative scale physically plausible",
    "Blend edges naturally with no cut-out halos or pasted-on look",
    "Keep depth of field consistent across all elements",
];

const MOODBOARD_INSTRUCTIONS: &str = "Emulate the mood, lighting, color treatment and composition of these moodboard images. Do not copy their subjects, products, logos or text; they are style references only.";

const IMAGE_OUTPUT_RULES: &str = "Produce one high-resolution, photorealistic marketing image. No watermarks, borders or added text unless the brand guidelines ask for them.";

/// Inputs to the image assembler.
#[derive(Debug, Clone)]
pub struct ImagePromptParams<'a> {
    /// How the reference images should interact, if described.
    pub reference_interaction: Option<&'a str>,
    /// Number of product/reference images sent with the prompt.
    pub reference_image_count: usize,
    /// Resolved creative-trend text.
    pub trend_text: Option<&'a str>,
    pub brand: &'a BrandKit,
    /// Moodboard images, sent after the reference images.
    pub moodboard_image_count: usize,
    pub aspect_ratio: AspectRatio,
}

/// Build the base prompt used for the first variant.
pub fn build_image_prompt(params: &ImagePromptParams<'_>) -> String {
    base_sections(params).build()
}

/// Build the prompt for a 1-based variant number.
///
/// Variant 1, and any variant without a spec, gets the base prompt.
pub fn build_variant_prompt(
    params: &ImagePromptParams<'_>,
    variant_number: usize,
    spec: Option<&VariationSpec>,
) -> String {
    let mut builder = base_sections(params);
    if variant_number > 1 {
        if let Some(body) = spec.and_then(variation_body) {
            builder.section(&variation_title(variant_number), body);
        }
    }
    builder.build()
}

/// Composition hint for an aspect ratio.
pub fn composition_hint(ratio: AspectRatio) -> &'static str {
    match (ratio.width, ratio.height) {
        (9, 16) => "Full-screen vertical feed format. Keep the hero subject in the central safe zone and leave the top 15% and bottom 25% free of key details so platform UI overlays do not cover them.",
        (1, 1) => "Square format. Use a centered, balanced composition that stays legible as a small grid thumbnail.",
        (4, 5) => "Portrait feed format. Fill the frame vertically and place the subject slightly above center.",
        (16, 9) => "Horizontal widescreen format. Use rule-of-thirds placement and leave negative space on one side for copy.",
        _ => "Use a balanced composition with the subject clearly framed and key details kept away from the edges.",
    }
}

fn base_sections(params: &ImagePromptParams<'_>) -> PromptBuilder {
    let mut builder = PromptBuilder::new();

    let interaction = params
        .reference_interaction
        .map(str::trim)
        .filter(|text| !text.is_empty() && params.reference_image_count > 1)
        .map(|text| {
            format!(
                "{}\n\nCompositing requirements:\n{}",
                text,
                bullets(COMPOSITING_REQUIREMENTS.iter().copied())
            )
        });
    builder.optional(REFERENCE_INTERACTION_TITLE, interaction);

    builder.optional(CREATIVE_TREND_TITLE, params.trend_text);

    builder.section(
        BRAND_GUIDELINES_TITLE,
        params
            .brand
            .guidelines
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_BRAND_GUIDELINES),
    );

    builder.section(
        COLOR_PALETTE_TITLE,
        format!(
            "Primary color: {}\nSecondary color: {}\nThe primary color should dominate the composition; use the secondary color as an accent only.",
            params.brand.primary_color, params.brand.secondary_color
        ),
    );

    if params.moodboard_image_count > 0 {
        let first = params.reference_image_count + 1;
        let last = params.reference_image_count + params.moodboard_image_count;
        let refs = (first..=last)
            .map(|n| format!("[image {}]", n))
            .collect::<Vec<_>>()
            .join(", ");
        builder.section(
            MOODBOARD_TITLE,
            format!("Moodboard images: {}\n{}", refs, MOODBOARD_INSTRUCTIONS),
        );
    }

    builder.section(
        IMAGE_SPECIFICATIONS_TITLE,
        format!(
            "Aspect ratio: {}\nComposition: {}\n{}",
            params.aspect_ratio,
            composition_hint(params.aspect_ratio),
            IMAGE_OUTPUT_RULES
        ),
    );

    builder
}

fn variation_title(variant_number: usize) -> String {
    format!("VARIATION {} SPECIFICS", variant_number)
}

fn variation_body(spec: &VariationSpec) -> Option<String> {
    if spec.is_empty() {
        return None;
    }
    let lines = spec
        .fields()
        .map(|(factor, value)| format!("{}: {}", factor.label(), value))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!(
        "{}\nKeep the product, branding and overall creative direction of the base concept; change only what is listed above.",
        lines
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SECTION_SEPARATOR;
    use vstudio_models::VarianceFactor;

    fn brand(guidelines: Option<&str>) -> BrandKit {
        BrandKit {
            guidelines: guidelines.map(str::to_string),
            ..BrandKit::default()
        }
    }

    fn params<'a>(brand: &'a BrandKit) -> ImagePromptParams<'a> {
        ImagePromptParams {
            reference_interaction: None,
            reference_image_count: 0,
            trend_text: None,
            brand,
            moodboard_image_count: 0,
            aspect_ratio: AspectRatio::PORTRAIT,
        }
    }

    #[test]
    fn test_minimal_prompt_has_three_sections() {
        let brand = brand(Some("Minimal, Scandinavian."));
        let prompt = build_image_prompt(&params(&brand));

        let sections: Vec<&str> = prompt.split(SECTION_SEPARATOR).collect();
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("BRAND GUIDELINES:\nMinimal, Scandinavian."));
        assert!(sections[1].starts_with("COLOR PALETTE:"));
        assert!(sections[2].starts_with("IMAGE SPECIFICATIONS:"));
        assert!(!prompt.contains(CREATIVE_TREND_TITLE));
    }

    #[test]
    fn test_optional_sections_toggle() {
        let brand = brand(None);
        let mut p = params(&brand);
        p.reference_image_count = 2;

        let prompt = build_image_prompt(&p);
        assert!(!prompt.contains("MOODBOARD"));
        assert!(!prompt.contains(REFERENCE_INTERACTION_TITLE));

        p.reference_interaction = Some("The model holds the serum bottle");
        let prompt = build_image_prompt(&p);
        assert_eq!(prompt.matches(REFERENCE_INTERACTION_TITLE).count(), 1);
        assert!(prompt.contains("Compositing requirements:"));
        assert!(!prompt.contains("MOODBOARD"));

        p.reference_interaction = None;
        p.moodboard_image_count = 1;
        let prompt = build_image_prompt(&p);
        assert_eq!(prompt.matches(MOODBOARD_TITLE).count(), 1);
        assert!(!prompt.contains(REFERENCE_INTERACTION_TITLE));
    }

    #[test]
    fn test_interaction_needs_two_references() {
        let brand = brand(None);
        let mut p = params(&brand);
        p.reference_interaction = Some("Blend them");
        p.reference_image_count = 1;
        assert!(!build_image_prompt(&p).contains(REFERENCE_INTERACTION_TITLE));
    }

    #[test]
    fn test_moodboard_indices_follow_references() {
        let brand = brand(None);
        let mut p = params(&brand);
        p.reference_image_count = 2;
        p.moodboard_image_count = 2;
        let prompt = build_image_prompt(&p);
        assert!(prompt.contains("Moodboard images: [image 3], [image 4]"));
        assert!(!prompt.contains("[image 2]"));
    }

    #[test]
    fn test_fallback_brand_guidelines() {
        let brand = brand(Some("   "));
        let prompt = build_image_prompt(&params(&brand));
        assert!(prompt.contains(DEFAULT_BRAND_GUIDELINES));
    }

    #[test]
    fn test_section_order() {
        let brand = brand(Some("Bold"));
        let p = ImagePromptParams {
            reference_interaction: Some("Stack them"),
            reference_image_count: 2,
            trend_text: Some("Trend: Neon"),
            brand: &brand,
            moodboard_image_count: 1,
            aspect_ratio: AspectRatio::SQUARE,
        };
        let prompt = build_image_prompt(&p);
        let positions: Vec<usize> = [
            REFERENCE_INTERACTION_TITLE,
            CREATIVE_TREND_TITLE,
            BRAND_GUIDELINES_TITLE,
            COLOR_PALETTE_TITLE,
            MOODBOARD_TITLE,
            IMAGE_SPECIFICATIONS_TITLE,
        ]
        .iter()
        .map(|title| prompt.find(&format!("{}:", title)).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_deterministic() {
        let brand = brand(Some("Warm"));
        let mut p = params(&brand);
        p.trend_text = Some("Trend: Flat lay");
        assert_eq!(build_image_prompt(&p), build_image_prompt(&p));
    }

    #[test]
    fn test_composition_hints() {
        assert!(composition_hint(AspectRatio::PORTRAIT).contains("vertical"));
        assert!(composition_hint(AspectRatio::FEED_PORTRAIT).contains("Portrait feed"));
        assert!(composition_hint(AspectRatio::new(21, 9)).starts_with("Use a balanced"));
        let brand = brand(None);
        let mut p = params(&brand);
        p.aspect_ratio = AspectRatio::LANDSCAPE;
        assert!(build_image_prompt(&p).contains("Aspect ratio: 16:9"));
    }

    #[test]
    fn test_variation_section() {
        let brand = brand(None);
        let p = params(&brand);
        let mut spec = VariationSpec::default();
        spec.set(VarianceFactor::Lighting, "Golden hour backlight");
        spec.set(VarianceFactor::Materials, "Matte ceramic");

        let base = build_image_prompt(&p);
        assert_eq!(build_variant_prompt(&p, 1, Some(&spec)), base);
        assert_eq!(build_variant_prompt(&p, 2, None), base);

        let variant = build_variant_prompt(&p, 3, Some(&spec));
        assert!(variant.starts_with(&base));
        let tail = &variant[base.len()..];
        assert_eq!(
            tail,
            "\n\n---\n\nVARIATION 3 SPECIFICS:\nLighting: Golden hour backlight\nMaterials: Matte ceramic\nKeep the product, branding and overall creative direction of the base concept; change only what is listed above."
        );
    }

    #[test]
    fn test_empty_variation_spec_is_ignored() {
        let brand = brand(None);
        let p = params(&brand);
        assert_eq!(
            build_variant_prompt(&p, 2, Some(&VariationSpec::default())),
            build_image_prompt(&p)
        );
    }
}
