//! Variation spec generation.

use tracing::{info, warn};
use vstudio_genai::GenerationClient;
use vstudio_models::{BrandKit, VarianceFactor, VariationSpec};
use vstudio_prompt::{normalize_specs, parse_variation_specs, variants_needed, variation_request_prompt};

/// Produce one spec per variant after the first.
///
/// Returns an empty list when there is one variant or no factors. Otherwise
/// always returns exactly `variant_count - 1` specs: the text model is asked
/// first, and anything it fails to provide comes from the canned fallbacks.
pub async fn generate_variation_specs(
    client: &dyn GenerationClient,
    base_direction: &str,
    brand: &BrandKit,
    factors: &[VarianceFactor],
    variant_count: u8,
) -> Vec<VariationSpec> {
    let needed = variants_needed(variant_count, factors);
    if needed == 0 {
        return Vec::new();
    }

    let prompt = variation_request_prompt(base_direction, brand, factors, needed);
    let parsed = match client.generate_text(&prompt).await {
        Ok(text) => match parse_variation_specs(&text) {
            Some(specs) => {
                info!(returned = specs.len(), needed, "Parsed AI variation specs");
                specs
            }
            None => {
                warn!(needed, "Variation output was not a JSON array, using fallback specs");
                Vec::new()
            }
        },
        Err(e) => {
            warn!(error = %e, needed, "Variation spec generation failed, using fallback specs");
            Vec::new()
        }
    };

    normalize_specs(parsed, factors, needed)
}
