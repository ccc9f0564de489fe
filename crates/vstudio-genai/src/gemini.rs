//! Gemini / Veo REST client.
//!
//! Text and images go through `models/{model}:generateContent`. Video goes
//! through Veo's `predictLongRunning`, then the returned operation is polled
//! until it finishes or the wall-clock ceiling is hit.

use std::time::Instant;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::GenerationClient;
use crate::config::GenAiConfig;
use crate::error::{GenAiError, GenAiResult};
use crate::metrics::{record_request, record_video_poll};
use crate::types::{GeneratedMedia, ImageInput, ImageRequest, VideoRequest};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Gemini API client.
pub struct GeminiClient {
    config: GenAiConfig,
    client: Client,
}

/// generateContent request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn image(image: &ImageInput) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: STANDARD.encode(&image.bytes),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    candidate_count: u8,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

/// generateContent response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

impl GeminiResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> + '_ {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
    }
}

/// predictLongRunning request.
#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoInstance {
    prompt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reference_images: Vec<VideoReference>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoReference {
    image: EncodedImage,
    reference_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedImage {
    bytes_base64_encoded: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    aspect_ratio: String,
    duration_seconds: u8,
}

/// Long-running operation.
#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<ProviderError>,
    #[serde(default)]
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoFile {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    /// Create a new client.
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, client })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        Self::new(GenAiConfig::from_env()?)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url, model, method)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        operation: &str,
    ) -> GenAiResult<T> {
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await?;
        record_request(operation, response.status().as_u16(), started.elapsed().as_secs_f64());
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, url: &str, operation: &str) -> GenAiResult<Response> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;
        record_request(operation, response.status().as_u16(), started.elapsed().as_secs_f64());
        check_status(response).await
    }

    async fn wait_for_operation(&self, mut operation: Operation) -> GenAiResult<Operation> {
        let started = Instant::now();
        let url = format!("{}/{}", self.config.base_url, operation.name);

        while !operation.done {
            let remaining = self.config.video_timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                record_video_poll("timeout", started.elapsed().as_secs_f64());
                warn!(operation = %operation.name, "Video operation timed out");
                return Err(GenAiError::Timeout(self.config.video_timeout));
            }
            tokio::time::sleep(self.config.poll_interval.min(remaining)).await;

            operation = self.get(&url, "video_poll").await?.json().await?;
            debug!(
                operation = %operation.name,
                done = operation.done,
                elapsed_secs = started.elapsed().as_secs(),
                "Polled video operation"
            );
        }

        record_video_poll("done", started.elapsed().as_secs_f64());
        Ok(operation)
    }

    async fn fetch_video(&self, operation: Operation) -> GenAiResult<GeneratedMedia> {
        if let Some(error) = operation.error {
            return Err(GenAiError::OperationFailed(error.message));
        }

        let video = operation
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().find_map(|s| s.video))
            .ok_or(GenAiError::NoVideoContent)?;

        if let Some(encoded) = video.bytes_base64_encoded {
            let bytes = STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| GenAiError::invalid_response(format!("Bad video payload: {}", e)))?;
            return Ok(GeneratedMedia {
                bytes,
                mime_type: video.mime_type.unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string()),
            });
        }

        let uri = video.uri.ok_or(GenAiError::NoVideoContent)?;
        debug!(uri = %uri, "Downloading generated video");
        let response = self.get(&uri, "video_download").await?;
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("video/"))
            .map(str::to_string)
            .or(video.mime_type)
            .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string());
        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(GenAiError::NoVideoContent);
        }

        Ok(GeneratedMedia { bytes, mime_type })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> GenAiResult<String> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: None,
        };

        let url = self.model_url(&self.config.text_model, "generateContent");
        let response: GeminiResponse = self.post_json(&url, &request, "text").await?;

        let text = response
            .parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            return Err(GenAiError::NoTextContent);
        }
        Ok(text)
    }

    async fn generate_image(&self, request: ImageRequest) -> GenAiResult<GeneratedMedia> {
        info!(
            model = %self.config.image_model,
            references = request.reference_images.len(),
            aspect_ratio = %request.aspect_ratio,
            "Generating image"
        );

        let mut parts: Vec<Part> = request.reference_images.iter().map(Part::image).collect();
        parts.push(Part::text(request.prompt));

        let body = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE"],
                candidate_count: request.count.max(1),
                image_config: ImageConfig {
                    aspect_ratio: request.aspect_ratio.to_string(),
                },
            }),
        };

        let url = self.model_url(&self.config.image_model, "generateContent");
        let response: GeminiResponse = self.post_json(&url, &body, "image").await?;

        let Some(inline) = response
            .parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/"))
        else {
            if let Some(text) = response.parts().find_map(|p| p.text.as_deref()) {
                warn!(response_text = %text, "Image model returned text instead of an image");
            }
            return Err(GenAiError::NoImageContent);
        };

        let bytes = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| GenAiError::invalid_response(format!("Bad image payload: {}", e)))?;

        Ok(GeneratedMedia {
            bytes,
            mime_type: inline.mime_type.clone(),
        })
    }

    async fn generate_video(&self, request: VideoRequest) -> GenAiResult<GeneratedMedia> {
        info!(
            model = %self.config.video_model,
            anchors = request.anchor_images.len(),
            duration = %request.duration,
            aspect_ratio = %request.aspect_ratio,
            "Starting video generation"
        );

        let body = PredictRequest {
            instances: vec![VideoInstance {
                prompt: request.prompt,
                reference_images: request
                    .anchor_images
                    .iter()
                    .map(|image| VideoReference {
                        image: EncodedImage {
                            bytes_base64_encoded: STANDARD.encode(&image.bytes),
                            mime_type: image.mime_type.clone(),
                        },
                        reference_type: "asset",
                    })
                    .collect(),
            }],
            parameters: VideoParameters {
                aspect_ratio: request.aspect_ratio.to_string(),
                duration_seconds: request.duration.seconds(),
            },
        };

        let url = self.model_url(&self.config.video_model, "predictLongRunning");
        let operation: Operation = self.post_json(&url, &body, "video").await?;
        info!(operation = %operation.name, "Video operation started");

        let operation = self.wait_for_operation(operation).await?;
        self.fetch_video(operation).await
    }
}

/// Turn a non-2xx response into an error carrying the provider's message.
async fn check_status(response: Response) -> GenAiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);
    Err(GenAiError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_shape() {
        let image = ImageInput::new(vec![1, 2, 3], "image/png");
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::image(&image), Part::text("hello")],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE"],
                candidate_count: 1,
                image_config: ImageConfig {
                    aspect_ratio: "9:16".into(),
                },
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["data"], "AQID");
        assert!(json["contents"][0]["parts"][0].get("text").is_none());
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "9:16");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_response_parts_flatten() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}},{"finishReason":"SAFETY"}]}"#,
        )
        .unwrap();
        let texts: Vec<_> = response.parts().filter_map(|p| p.text.as_deref()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
