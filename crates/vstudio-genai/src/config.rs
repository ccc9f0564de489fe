//! Generation client configuration.

use std::time::Duration;

use crate::error::{GenAiError, GenAiResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-generate-preview";

/// Configuration for the Gemini / Veo client.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,
    /// API root including the version segment
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub video_model: String,
    /// Per-HTTP-request timeout
    pub request_timeout: Duration,
    /// Delay between video operation polls
    pub poll_interval: Duration,
    /// Wall-clock ceiling for one video generation
    pub video_timeout: Duration,
}

impl GenAiConfig {
    /// Config with default models and timings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(10),
            video_timeout: Duration::from_secs(300),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenAiError::config_error("GEMINI_API_KEY not set"))?;

        let defaults = Self::new(api_key);
        Ok(Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            text_model: std::env::var("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: std::env::var("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            video_model: std::env::var("VEO_MODEL").unwrap_or(defaults.video_model),
            request_timeout: env_secs("GENAI_REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            poll_interval: env_secs("VIDEO_POLL_INTERVAL").unwrap_or(defaults.poll_interval),
            video_timeout: env_secs("VIDEO_TIMEOUT").unwrap_or(defaults.video_timeout),
            api_key: defaults.api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_video_timing(mut self, poll_interval: Duration, video_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.video_timeout = video_timeout;
        self
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenAiConfig::new("key");
        assert_eq!(config.video_timeout, Duration::from_secs(300));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let config = GenAiConfig::new("key").with_base_url("http://localhost:1234/");
        assert_eq!(config.base_url, "http://localhost:1234");
    }
}
