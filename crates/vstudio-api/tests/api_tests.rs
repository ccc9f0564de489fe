//! Router integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vstudio_api::{create_router, ApiConfig, AppState};
use vstudio_genai::{
    GenAiError, GenAiResult, GeneratedMedia, GenerationClient, ImageRequest, VideoRequest,
};
use vstudio_pipeline::LocalAssetStore;

const BOUNDARY: &str = "vstudio-test-boundary";

/// Returns fixed media and remembers the reference images it was given.
#[derive(Default)]
struct FakeClient {
    reference_images: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl GenerationClient for FakeClient {
    async fn generate_text(&self, _prompt: &str) -> GenAiResult<String> {
        Err(GenAiError::RequestFailed {
            status: 503,
            message: "text model unavailable".to_string(),
        })
    }

    async fn generate_image(&self, request: ImageRequest) -> GenAiResult<GeneratedMedia> {
        let mut seen = self.reference_images.lock().unwrap();
        seen.extend(request.reference_images.into_iter().map(|image| image.bytes));
        Ok(GeneratedMedia {
            bytes: b"fake-png".to_vec(),
            mime_type: "image/png".to_string(),
        })
    }

    async fn generate_video(&self, _request: VideoRequest) -> GenAiResult<GeneratedMedia> {
        Ok(GeneratedMedia {
            bytes: b"fake-mp4".to_vec(),
            mime_type: "video/mp4".to_string(),
        })
    }
}

struct TestApp {
    router: Router,
    client: Arc<FakeClient>,
    _media: TempDir,
}

async fn test_app(config: ApiConfig) -> TestApp {
    let media = TempDir::new().unwrap();
    let config = ApiConfig {
        media_dir: media.path().to_path_buf(),
        ..config
    };
    let client = Arc::new(FakeClient::default());
    let store = tokio_test::assert_ok!(LocalAssetStore::new(media.path(), "/media").await);
    let state = AppState::with_components(config, client.clone(), Arc::new(store));
    TestApp {
        router: create_router(state, None),
        client,
        _media: media,
    }
}

/// A multipart form field: (name, optional (file name, content type), body).
type Part<'a> = (&'a str, Option<(&'a str, &'a str)>, &'a str);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
            }
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn generate_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

/// Parse every `data:` frame of an SSE body.
fn sse_events(body: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(body)
        .split("\n\n")
        .filter_map(|frame| {
            frame
                .lines()
                .find_map(|line| line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")))
                .map(|data| serde_json::from_str(data.trim()).unwrap())
        })
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(ApiConfig::default()).await;

    let response = app.router.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = test_app(ApiConfig::default()).await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_ready_with_media_dir() {
    let app = test_app(ApiConfig::default()).await;

    let response = app.router.oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ready");
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let app = test_app(ApiConfig::default()).await;

    let response = app.router.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_presets_hides_prompt_text() {
    let app = test_app(ApiConfig::default()).await;

    let response = app.router.oneshot(get("/api/presets/video")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let presets = json.as_array().unwrap();
    assert!(!presets.is_empty());
    for preset in presets {
        assert!(preset["id"].is_string());
        assert!(preset["name"].is_string());
        assert!(preset["description"].is_string());
        assert!(preset.get("prompt").is_none());
    }
}

#[tokio::test]
async fn test_list_presets_unknown_mode() {
    let app = test_app(ApiConfig::default()).await;

    let response = app.router.oneshot(get("/api/presets/audio")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("audio"));
}

#[tokio::test]
async fn test_generate_without_config_streams_one_error() {
    let app = test_app(ApiConfig::default()).await;

    let response = app
        .router
        .oneshot(generate_request(&[(
            "productImage_0",
            Some(("a.png", "image/png")),
            "img",
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let events = sse_events(&body_bytes(response).await);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["error"], "Missing generation configuration");
}

#[tokio::test]
async fn test_generate_image_streams_progress_and_result() {
    let app = test_app(ApiConfig::default()).await;
    let config = r#"{"mode":"image","aspectRatio":"1:1","variantCount":1}"#;

    let response = app
        .router
        .clone()
        .oneshot(generate_request(&[
            ("config", None, config),
            ("productImage_1", Some(("second.png", "image/png")), "second"),
            ("productImage_0", Some(("first.png", "image/png")), "first"),
            ("somethingElse", None, "ignored"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let events = sse_events(&body_bytes(response).await);
    let last = events.last().unwrap();
    assert_eq!(last["progress"], 100);

    let progress: Vec<u64> = events
        .iter()
        .filter_map(|e| e["progress"].as_u64())
        .collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));

    let result = events.iter().find(|e| e.get("result").is_some()).unwrap();
    assert_eq!(result["metadata"]["aspectRatio"], "1:1");
    assert!(events.iter().all(|e| e.get("error").is_none()));

    // Uploads reach the model in suffix order.
    assert_eq!(
        *app.client.reference_images.lock().unwrap(),
        vec![b"first".to_vec(), b"second".to_vec()]
    );

    // The stored asset is served back.
    let url = result["result"]["url"].as_str().unwrap();
    let media = app.router.oneshot(get(url)).await.unwrap();
    assert_eq!(media.status(), StatusCode::OK);
    assert_eq!(body_bytes(media).await, b"fake-png".to_vec());
}

#[tokio::test]
async fn test_generate_video_reports_effective_duration() {
    let app = test_app(ApiConfig::default()).await;
    let config = r#"{"mode":"video","duration":4,"narrative":"A mug on a desk"}"#;

    let response = app
        .router
        .oneshot(generate_request(&[
            ("config", None, config),
            ("anchorImage_0", Some(("mug.jpg", "image/jpeg")), "mug"),
        ]))
        .await
        .unwrap();

    let events = sse_events(&body_bytes(response).await);
    let result = events.iter().find(|e| e.get("result").is_some()).unwrap();
    assert_eq!(result["metadata"]["duration"], "8s");
    assert_eq!(result["metadata"]["hasReferenceImages"], true);
    assert_eq!(events.last().unwrap()["progress"], 100);
}

#[tokio::test]
async fn test_rate_limit_applies_to_api_routes() {
    let app = test_app(ApiConfig {
        rate_limit_rps: 1,
        rate_limit_burst: 1,
        ..Default::default()
    })
    .await;

    let request = || {
        Request::builder()
            .uri("/api/presets/image")
            .header("x-forwarded-for", "192.0.2.10")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.router.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.router.clone().oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers()[header::RETRY_AFTER], "1");
    let json: Value = serde_json::from_slice(&body_bytes(second).await).unwrap();
    assert_eq!(json["detail"], "Rate limited");

    // Health checks are not rate limited.
    let health = Request::builder()
        .uri("/health")
        .header("x-forwarded-for", "192.0.2.10")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.router.oneshot(health).await.unwrap().status(), StatusCode::OK);
}
