//! Progress stream events.
//!
//! Each event is serialized as one of three JSON shapes so the studio UI can
//! tell them apart by key: `{status, progress}`, `{result, metadata}` or
//! `{error}`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stored piece of generated media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAsset {
    pub file_id: String,
    pub file_name: String,
    pub mime_type: String,
    /// Path the asset is served from.
    pub url: String,
}

/// Result body: one asset, or an ordered batch of image variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResultPayload {
    Single(GeneratedAsset),
    Batch(Vec<GeneratedAsset>),
}

impl ResultPayload {
    /// Single asset for one item, batch otherwise.
    pub fn from_assets(mut assets: Vec<GeneratedAsset>) -> Self {
        if assets.len() == 1 {
            ResultPayload::Single(assets.remove(0))
        } else {
            ResultPayload::Batch(assets)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultPayload::Single(_) => 1,
            ResultPayload::Batch(assets) => assets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Request echo attached to an image result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResultMetadata {
    pub aspect_ratio: String,
    pub count: u8,
    pub trend: String,
}

/// Request echo attached to a video result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResultMetadata {
    pub trend: String,
    pub duration: String,
    pub aspect_ratio: String,
    pub has_reference_images: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResultMetadata {
    Video(VideoResultMetadata),
    Image(ImageResultMetadata),
}

/// One event on the progress stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ProgressEvent {
    /// Intermediate status update (0-100).
    Status { status: String, progress: u8 },

    /// Terminal success.
    Result {
        result: ResultPayload,
        metadata: ResultMetadata,
    },

    /// Terminal failure.
    Error { error: String },
}

impl ProgressEvent {
    /// Create a status event. Progress is clamped to 100.
    pub fn status(message: impl Into<String>, progress: u8) -> Self {
        ProgressEvent::Status {
            status: message.into(),
            progress: progress.min(100),
        }
    }

    pub fn result(result: ResultPayload, metadata: ResultMetadata) -> Self {
        ProgressEvent::Result { result, metadata }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProgressEvent::Error {
            error: message.into(),
        }
    }

    /// Percentage carried by a status event.
    pub fn progress(&self) -> Option<u8> {
        match self {
            ProgressEvent::Status { progress, .. } => Some(*progress),
            _ => None,
        }
    }

    /// Whether this event settles the request outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Result { .. } | ProgressEvent::Error { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Status { .. } => "status",
            ProgressEvent::Result { .. } => "result",
            ProgressEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str) -> GeneratedAsset {
        GeneratedAsset {
            file_id: id.to_string(),
            file_name: format!("{}.png", id),
            mime_type: "image/png".to_string(),
            url: format!("/media/{}.png", id),
        }
    }

    #[test]
    fn test_status_shape() {
        let json = serde_json::to_value(ProgressEvent::status("Generating", 150)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "Generating", "progress": 100}));
    }

    #[test]
    fn test_error_shape() {
        let json = serde_json::to_value(ProgressEvent::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn test_image_result_shape() {
        let event = ProgressEvent::result(
            ResultPayload::from_assets(vec![asset("a"), asset("b")]),
            ResultMetadata::Image(ImageResultMetadata {
                aspect_ratio: "9:16".into(),
                count: 2,
                trend: "none".into(),
            }),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["result"][1]["fileName"], "b.png");
        assert_eq!(json["metadata"]["aspectRatio"], "9:16");
        assert_eq!(json["metadata"]["count"], 2);

        let back: ProgressEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_single_payload_is_flat() {
        let payload = ResultPayload::from_assets(vec![asset("solo")]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["mimeType"], "image/png");
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn test_video_metadata_roundtrip() {
        let event = ProgressEvent::result(
            ResultPayload::Single(asset("clip")),
            ResultMetadata::Video(VideoResultMetadata {
                trend: "pov-story".into(),
                duration: "8s".into(),
                aspect_ratio: "9:16".into(),
                has_reference_images: true,
            }),
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"hasReferenceImages\":true"));
        let back: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert!(back.is_terminal());
        assert_eq!(back, event);
    }
}
