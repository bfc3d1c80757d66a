//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method and status
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_retries_total` (counter): recovery cycles by alias
//! - `proxy_rate_limited_total` (counter): rejected requests by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record one recovery cycle.
pub fn record_retry(alias: &str) {
    metrics::counter!("proxy_retries_total", "alias" => alias.to_string()).increment(1);
}

/// Record one rate-limited request.
pub fn record_rate_limited(reason: &'static str) {
    metrics::counter!("proxy_rate_limited_total", "reason" => reason).increment(1);
}
