//! Creative-trend resolution, including the AI expansion call.

use tracing::{info, warn};
use vstudio_genai::GenerationClient;
use vstudio_models::{GenerationMode, TrendSelection};
use vstudio_prompt::{resolve_trend_text, trend_expansion_prompt, PresetCatalog};

/// Resolve a trend selection into the creative-trend section text.
///
/// AI selections are expanded by the text model first. A failed expansion
/// is not fatal: the user's own description is used, and the section is
/// omitted when that is blank too.
pub async fn resolve_trend(
    client: &dyn GenerationClient,
    selection: &TrendSelection,
    mode: GenerationMode,
) -> Option<String> {
    let expanded = match selection {
        TrendSelection::AiGenerated { description } => {
            match client
                .generate_text(&trend_expansion_prompt(description, mode))
                .await
            {
                Ok(text) => {
                    info!(mode = %mode, chars = text.len(), "Expanded AI trend description");
                    Some(text)
                }
                Err(e) => {
                    warn!(mode = %mode, error = %e, "Trend expansion failed, using short description");
                    None
                }
            }
        }
        _ => None,
    };

    resolve_trend_text(selection, PresetCatalog::for_mode(mode), expanded.as_deref())
}
