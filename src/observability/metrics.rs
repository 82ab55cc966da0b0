//! Metrics collection and exposition.
//!
//! # Metrics
//! - `header_guard_requests_total` (counter): requests by route, status
//! - `header_guard_request_duration_seconds` (histogram): latency by route
//! - `header_guard_headers_set_total` (counter): security headers written
//! - `header_guard_headers_suppressed_total` (counter): headers cleared
//! - `header_guard_duplicates_collapsed_total` (counter): duplicate entries deactivated
//! - `header_guard_stage_failures_total` (counter): pipeline failures by stage

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::security::PolicyReport;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    let route = route.to_string();
    counter!(
        "header_guard_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("header_guard_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_policy(report: &PolicyReport) {
    counter!("header_guard_headers_set_total").increment(report.set as u64);
    counter!("header_guard_headers_suppressed_total").increment(report.suppressed as u64);
    if report.collapsed > 0 {
        counter!("header_guard_duplicates_collapsed_total").increment(report.collapsed as u64);
    }
}

pub fn record_stage_failure(stage: &'static str) {
    counter!("header_guard_stage_failures_total", "stage" => stage).increment(1);
}
