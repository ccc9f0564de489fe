//! Persistence for generated media.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use vstudio_genai::GeneratedMedia;
use vstudio_models::GeneratedAsset;

use crate::error::{PipelineError, PipelineResult};

/// Where generated media ends up.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist one piece of media and describe where it is served from.
    async fn save(&self, media: &GeneratedMedia) -> PipelineResult<GeneratedAsset>;
}

/// Stores media as files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalAssetStore {
    /// Create the store, creating `root` if needed. Files are served under
    /// `url_prefix` (e.g. `/media`).
    pub async fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> PipelineResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn save(&self, media: &GeneratedMedia) -> PipelineResult<GeneratedAsset> {
        let file_id = Uuid::new_v4().to_string();
        let file_name = format!("{}.{}", file_id, extension_for(&media.mime_type));
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, &media.bytes)
            .await
            .map_err(|e| PipelineError::storage(format!("{}: {}", path.display(), e)))?;
        debug!(file = %path.display(), bytes = media.bytes.len(), "Stored generated media");

        Ok(GeneratedAsset {
            url: format!("{}/{}", self.url_prefix, file_name),
            file_id,
            file_name,
            mime_type: media.mime_type.clone(),
        })
    }
}

/// File extension for a MIME type.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type.split(';').next().unwrap_or_default().trim() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("video/mp4; codecs=avc1"), "mp4");
        assert_eq!(extension_for("application/octet-stream"), "bin");
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path().join("media"), "/media/")
            .await
            .unwrap();

        let asset = tokio_test::assert_ok!(
            store
                .save(&GeneratedMedia {
                    bytes: vec![1, 2, 3],
                    mime_type: "image/png".into(),
                })
                .await
        );

        assert!(asset.file_name.ends_with(".png"));
        assert!(asset.file_name.starts_with(&asset.file_id));
        assert_eq!(asset.url, format!("/media/{}", asset.file_name));
        let written = std::fs::read(store.root().join(&asset.file_name)).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }
}
