//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vstudio_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vstudio_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vstudio_http_requests_in_flight";

    // Progress streams
    pub const SSE_STREAMS_TOTAL: &str = "vstudio_sse_streams_total";
    pub const UPLOADED_IMAGES_TOTAL: &str = "vstudio_uploaded_images_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vstudio_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a progress stream being opened.
pub fn record_sse_stream() {
    counter!(names::SSE_STREAMS_TOTAL).increment(1);
}

/// Record images received with a generation request, by slot.
pub fn record_uploaded_images(slot: &str, count: usize) {
    counter!(names::UPLOADED_IMAGES_TOTAL, "slot" => slot.to_string()).increment(count as u64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(path: &str) {
    counter!(names::RATE_LIMIT_HITS_TOTAL, "path" => sanitize_path(path)).increment(1);
}

static MEDIA_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/media/[^/]+$").expect("valid regex")
});

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}(/|$)")
        .expect("valid regex")
});

/// Sanitize path for metrics labels (replace dynamic segments).
pub fn sanitize_path(path: &str) -> String {
    if MEDIA_FILE.is_match(path) {
        return "/media/:file_name".to_string();
    }
    UUID_SEGMENT.replace_all(path, "/:id$1").to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    // Streaming responses are counted when headers are sent, not when the stream ends.
    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/media/550e8400-e29b-41d4-a716-446655440000.png"),
            "/media/:file_name"
        );
        assert_eq!(
            sanitize_path("/api/things/550e8400-e29b-41d4-a716-446655440000"),
            "/api/things/:id"
        );
        assert_eq!(sanitize_path("/api/presets/image"), "/api/presets/image");
    }
}
