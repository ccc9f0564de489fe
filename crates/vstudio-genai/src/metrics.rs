//! Provider call metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Provider requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "vstudio_genai_requests_total";

    /// Provider request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "vstudio_genai_latency_seconds";

    /// Wall-clock time spent waiting on video operations.
    pub const VIDEO_POLL_SECONDS: &str = "vstudio_genai_video_poll_seconds";
}

/// Record a completed provider request.
pub fn record_request(operation: &str, status: u16, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_secs);
}

/// Record how long a video operation took to settle.
pub fn record_video_poll(outcome: &str, secs: f64) {
    histogram!(names::VIDEO_POLL_SECONDS, "outcome" => outcome.to_string()).record(secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.starts_with("vstudio_"));
        assert!(names::VIDEO_POLL_SECONDS.contains("video"));
    }
}
