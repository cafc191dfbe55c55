//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): exchanges by method, status
//! - `bridge_request_duration_seconds` (histogram): latency distribution
//! - `bridge_bypassed_total` (counter): requests answered without dispatch
//! - `bridge_errors_total` (counter): failed exchanges by kind
//! - `bridge_reloads_total` (counter): reloads by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("bridge_requests_total", &labels).increment(1);
    histogram!("bridge_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_bypass() {
    counter!("bridge_bypassed_total").increment(1);
}

pub fn record_error(kind: &'static str) {
    counter!("bridge_errors_total", "kind" => kind).increment(1);
}

pub fn record_reload(outcome: &'static str) {
    counter!("bridge_reloads_total", "outcome" => outcome).increment(1);
}
