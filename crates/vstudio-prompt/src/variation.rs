//! Variation spec helpers: canned fallbacks, AI output parsing and the
//! request prompt. The async generator lives in the pipeline crate.

use serde_json::Value;
use tracing::debug;
use vstudio_models::{BrandKit, VarianceFactor, VariationSpec};

const LIGHTING_FALLBACKS: [&str; 5] = [
    "Warm golden-hour sunlight from a low side angle with long soft shadows",
    "Cool, diffused overcast daylight with minimal shadows",
    "High-contrast studio lighting with a strong key light and crisp rim light",
    "Soft window light from one side with gentle falloff",
    "Moody evening light with colored practical lamps in the background",
];

const ENVIRONMENT_FALLBACKS: [&str; 5] = [
    "A minimal modern interior with neutral tones",
    "An outdoor urban setting with soft background blur",
    "A natural setting with plants and organic textures",
    "A clean seamless studio backdrop in a brand-adjacent color",
    "A cozy lifestyle scene at home",
];

const CAMERA_FALLBACKS: [&str; 5] = [
    "Eye-level straight-on shot",
    "Low angle looking up to give the product presence",
    "Top-down overhead shot",
    "Three-quarter angle from slightly above",
    "Tight close-up with shallow depth of field",
];

const MATERIALS_FALLBACKS: [&str; 5] = [
    "Matte surfaces with soft natural textures",
    "Glossy reflective surfaces",
    "Raw wood and linen",
    "Polished marble and brushed metal",
    "Colored acrylic and frosted glass",
];

/// Phrases for factors that were not requested.
fn neutral_phrase(factor: VarianceFactor) -> &'static str {
    match factor {
        VarianceFactor::Lighting => "Keep the lighting consistent with the base image",
        VarianceFactor::Environment => "Keep the environment consistent with the base image",
        VarianceFactor::CameraAngle => "Keep the camera angle consistent with the base image",
        VarianceFactor::Materials => "Keep the materials consistent with the base image",
    }
}

/// Canned phrase for a factor at a 0-based spec index.
pub fn fallback_phrase(factor: VarianceFactor, index: usize) -> &'static str {
    let table = match factor {
        VarianceFactor::Lighting => &LIGHTING_FALLBACKS,
        VarianceFactor::Environment => &ENVIRONMENT_FALLBACKS,
        VarianceFactor::CameraAngle => &CAMERA_FALLBACKS,
        VarianceFactor::Materials => &MATERIALS_FALLBACKS,
    };
    table[index % table.len()]
}

/// Deterministic spec for a 0-based index. All four fields are populated.
pub fn fallback_spec(index: usize, factors: &[VarianceFactor]) -> VariationSpec {
    let mut spec = VariationSpec::default();
    for &factor in VarianceFactor::ALL {
        if factors.contains(&factor) {
            spec.set(factor, fallback_phrase(factor, index));
        } else {
            spec.set(factor, neutral_phrase(factor));
        }
    }
    spec
}

pub fn fallback_specs(factors: &[VarianceFactor], count: usize) -> Vec<VariationSpec> {
    (0..count).map(|i| fallback_spec(i, factors)).collect()
}

/// Number of specs a request needs: one per variant after the first, or none
/// when no factors were requested.
pub fn variants_needed(variant_count: u8, factors: &[VarianceFactor]) -> usize {
    if variant_count <= 1 || factors.is_empty() {
        0
    } else {
        usize::from(variant_count) - 1
    }
}

/// Strip a surrounding fenced code block, with or without a language tag.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output into specs. `None` when the text is not a JSON array.
///
/// Non-object entries are kept as empty specs so later entries keep their
/// positions.
pub fn parse_variation_specs(text: &str) -> Option<Vec<VariationSpec>> {
    let value: Value = match serde_json::from_str(strip_code_fence(text)) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Variation output is not valid JSON");
            return None;
        }
    };
    let Value::Array(items) = value else {
        debug!("Variation output is not a JSON array");
        return None;
    };
    Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    )
}

/// Shape parsed specs into exactly `needed` entries covering every field.
///
/// Extra entries are dropped. Missing entries, and requested fields the model
/// left blank, come from the canned fallbacks for that index. Unrequested
/// fields get the neutral phrase.
pub fn normalize_specs(
    parsed: Vec<VariationSpec>,
    factors: &[VarianceFactor],
    needed: usize,
) -> Vec<VariationSpec> {
    let mut specs: Vec<VariationSpec> = parsed.into_iter().take(needed).collect();
    for (index, spec) in specs.iter_mut().enumerate() {
        for &factor in VarianceFactor::ALL {
            let requested = factors.contains(&factor);
            let present = spec
                .get(factor)
                .is_some_and(|value| !value.trim().is_empty());
            if !requested {
                spec.set(factor, neutral_phrase(factor));
            } else if !present {
                spec.set(factor, fallback_phrase(factor, index));
            }
        }
    }
    let start = specs.len();
    specs.extend((start..needed).map(|i| fallback_spec(i, factors)));
    specs
}

/// Instruction asking the text model for `count` variation specs.
pub fn variation_request_prompt(
    base_direction: &str,
    brand: &BrandKit,
    factors: &[VarianceFactor],
    count: usize,
) -> String {
    let factor_list = factors
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let guidelines = brand
        .guidelines
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or("None provided");

    format!(
        r#"You are an art director planning variations of a product marketing image.

Base creative direction:
{base}

Brand guidelines:
{guidelines}
Brand colors: primary {primary}, secondary {secondary}

Create exactly {count} variations. Vary only these factors: {factor_list}.
Each variation must be clearly distinct from the others while staying cohesive with the brand.
For factors that should not vary, describe keeping them consistent with the base image.

Respond with a JSON array of exactly {count} objects and nothing else. Each object must have exactly these string fields:
"lighting", "environment", "cameraAngle", "materials""#,
        base = base_direction.trim(),
        guidelines = guidelines,
        primary = brand.primary_color,
        secondary = brand.secondary_color,
        count = count,
        factor_list = factor_list,
    )
}
