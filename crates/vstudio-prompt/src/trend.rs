//! Creative-trend resolution.

use tracing::warn;
use vstudio_models::TrendSelection;

use crate::presets::PresetCatalog;

/// Resolve a trend selection to the text of its prompt section.
///
/// `expanded` is the AI-expanded creative direction for an
/// [`TrendSelection::AiGenerated`] selection. When expansion was unavailable
/// the user's own short description is used instead. Unknown preset ids yield
/// `None`, which drops the section.
pub fn resolve_trend_text(
    selection: &TrendSelection,
    catalog: &PresetCatalog,
    expanded: Option<&str>,
) -> Option<String> {
    match selection {
        TrendSelection::Preset { id } => match catalog.lookup(id) {
            Some(preset) => Some(format!("Trend: {}\n{}", preset.name, preset.prompt)),
            None => {
                warn!(preset_id = %id, "Unknown trend preset, omitting creative trend section");
                None
            }
        },
        TrendSelection::AiGenerated { description } => expanded
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .or_else(|| Some(description.trim()).filter(|text| !text.is_empty()))
            .map(str::to_string),
        TrendSelection::Skip => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{image_catalog, video_catalog};

    #[test]
    fn test_preset_resolution() {
        let selection = TrendSelection::Preset {
            id: "pov-story".into(),
        };
        let text = resolve_trend_text(&selection, video_catalog(), None).unwrap();
        assert!(text.starts_with("Trend: POV Story\n"));

        // Video preset ids are not valid in the image catalog.
        assert!(resolve_trend_text(&selection, image_catalog(), None).is_none());
    }

    #[test]
    fn test_ai_resolution_prefers_expansion() {
        let selection = TrendSelection::AiGenerated {
            description: "slow-mo pour".into(),
        };
        assert_eq!(
            resolve_trend_text(&selection, image_catalog(), Some("A detailed direction")),
            Some("A detailed direction".to_string())
        );
        assert_eq!(
            resolve_trend_text(&selection, image_catalog(), Some("  ")),
            Some("slow-mo pour".to_string())
        );
        assert_eq!(
            resolve_trend_text(&selection, image_catalog(), None),
            Some("slow-mo pour".to_string())
        );
    }

    #[test]
    fn test_skip() {
        assert!(resolve_trend_text(&TrendSelection::Skip, image_catalog(), Some("x")).is_none());
    }
}
