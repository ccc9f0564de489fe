//! Trend preset listing.

use axum::extract::Path;
use axum::Json;
use vstudio_models::GenerationMode;
use vstudio_prompt::{PresetCatalog, TrendPreset};

use crate::error::{ApiError, ApiResult};

/// List the presets offered for a generation mode (`image` or `video`).
///
/// Each entry serializes as `{id, name, description}`; the prompt fragment
/// stays server side.
pub async fn list_presets(Path(mode): Path<String>) -> ApiResult<Json<&'static [TrendPreset]>> {
    let mode: GenerationMode = mode
        .parse()
        .map_err(|_| ApiError::not_found(format!("No presets for mode '{}'", mode)))?;
    Ok(Json(PresetCatalog::for_mode(mode).presets()))
}
