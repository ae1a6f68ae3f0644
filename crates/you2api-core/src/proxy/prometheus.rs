//! Prometheus metrics for the bridge.
//!
//! - `you2api_http_requests_total{method,endpoint,status}` - Counter of handled requests
//! - `you2api_request_duration_seconds{method,endpoint,status_class}` - Histogram of request durations
//! - `you2api_uploads_total{outcome}` - Counter of content uploads
//! - `you2api_uptime_seconds` - Gauge of server uptime

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

static METRICS_START_TIME: OnceLock<Instant> = OnceLock::new();

/// Buckets sized for a chat backend: quick model listings up to minute-long generations.
const LLM_LATENCY_BUCKETS: &[f64] = &[0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0];

/// Install the global Prometheus recorder.
///
/// Safe to call more than once; later calls return the existing handle. Returns
/// `None` if the recorder could not be installed (another recorder is already
/// registered), in which case metrics are silently dropped.
pub fn init_metrics() -> Option<PrometheusHandle> {
    let _ = METRICS_START_TIME.get_or_init(Instant::now);

    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Some(handle.clone());
    }

    let handle = match PrometheusBuilder::new()
        .set_buckets(LLM_LATENCY_BUCKETS)
        .and_then(PrometheusBuilder::install_recorder)
    {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!("[Metrics] Failed to install Prometheus recorder: {}", e);
            return None;
        },
    };

    describe_counter!("you2api_http_requests_total", "Total number of HTTP requests handled");
    describe_histogram!("you2api_request_duration_seconds", "Request duration in seconds");
    describe_counter!("you2api_uploads_total", "Content uploads to upstream by outcome");
    describe_gauge!("you2api_uptime_seconds", "Server uptime in seconds");

    let _ = PROMETHEUS_HANDLE.set(handle);
    PROMETHEUS_HANDLE.get().cloned()
}

pub fn get_prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Record one handled HTTP request.
pub fn record_request(method: &str, endpoint: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("endpoint", endpoint.to_string()),
        ("status", status.to_string()),
    ];
    counter!("you2api_http_requests_total", &labels).increment(1);

    let labels = [
        ("method", method.to_string()),
        ("endpoint", endpoint.to_string()),
        ("status_class", status_category(status).to_string()),
    ];
    histogram!("you2api_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

pub fn record_upload(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("you2api_uploads_total", "outcome" => outcome).increment(1);
}

pub fn update_uptime_gauge() {
    if let Some(start) = METRICS_START_TIME.get() {
        gauge!("you2api_uptime_seconds").set(start.elapsed().as_secs_f64());
    }
}

/// Render all metrics in Prometheus text format.
pub fn render_metrics() -> String {
    update_uptime_gauge();

    if let Some(handle) = get_prometheus_handle() {
        handle.render()
    } else {
        String::from("# Metrics not initialized\n")
    }
}

/// Convert HTTP status code to category for metrics labels.
pub fn status_category(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
