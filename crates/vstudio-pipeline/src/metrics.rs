//! Generation metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Requests accepted by the dispatcher, by mode.
    pub const REQUESTS_TOTAL: &str = "vstudio_generation_requests_total";

    /// Units of work (one image or one video) by mode and outcome.
    pub const UNITS_TOTAL: &str = "vstudio_generation_units_total";

    /// Time to run one unit of work, in seconds.
    pub const UNIT_DURATION_SECONDS: &str = "vstudio_generation_unit_duration_seconds";

    /// Requests rejected before dispatch.
    pub const CONFIG_ERRORS_TOTAL: &str = "vstudio_generation_config_errors_total";
}

pub fn record_request(mode: &str) {
    counter!(names::REQUESTS_TOTAL, "mode" => mode.to_string()).increment(1);
}

/// Record a finished unit of work.
pub fn record_unit(mode: &str, outcome: &str, duration_secs: f64) {
    counter!(
        names::UNITS_TOTAL,
        "mode" => mode.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!(names::UNIT_DURATION_SECONDS, "mode" => mode.to_string()).record(duration_secs);
}

pub fn record_config_error() {
    counter!(names::CONFIG_ERRORS_TOTAL).increment(1);
}
