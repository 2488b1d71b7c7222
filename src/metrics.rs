//! Adapter metrics, recorded through the `metrics` facade.
//!
//! Nothing here installs a recorder; without one every call is a no-op.

use metrics::{counter, histogram};

pub fn request_success(source: &str, duration_secs: f64, payload_bytes: usize) {
    counter!("aq_source_requests_total", "source" => source.to_string(), "outcome" => "success")
        .increment(1);
    histogram!("aq_fetch_duration_seconds", "source" => source.to_string()).record(duration_secs);
    histogram!("aq_payload_bytes", "source" => source.to_string()).record(payload_bytes as f64);
}

pub fn request_error(source: &str) {
    counter!("aq_source_requests_total", "source" => source.to_string(), "outcome" => "fetch_error")
        .increment(1);
}

pub fn parse_error(source: &str) {
    counter!("aq_source_requests_total", "source" => source.to_string(), "outcome" => "parse_error")
        .increment(1);
}

pub fn measurements_emitted(source: &str, count: usize) {
    counter!("aq_measurements_emitted_total", "source" => source.to_string()).increment(count as u64);
}

pub fn values_dropped(source: &str, count: usize) {
    counter!("aq_values_dropped_total", "source" => source.to_string()).increment(count as u64);
}
