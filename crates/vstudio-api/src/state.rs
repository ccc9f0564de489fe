//! Application state.

use std::sync::Arc;

use vstudio_genai::{GeminiClient, GenerationClient};
use vstudio_pipeline::{AssetStore, Dispatcher, LocalAssetStore};

use crate::config::{ApiConfig, MEDIA_URL_PREFIX};
use crate::error::ApiResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create application state backed by Gemini and the local media directory.
    pub async fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = GeminiClient::from_env()?;
        let store = LocalAssetStore::new(config.media_dir.clone(), MEDIA_URL_PREFIX).await?;
        Ok(Self::with_components(config, Arc::new(client), Arc::new(store)))
    }

    /// Assemble state from an existing client and store.
    pub fn with_components(
        config: ApiConfig,
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(client, store),
        }
    }
}
