//! Metrics collection and exposition.
//!
//! # Metrics
//! - `block_page_requests_total` (counter): responses by format and status
//! - `block_page_rule_lookups_total` (counter): resolver outcomes
//! - `block_page_upstream_attempts_total` (counter): gateway API attempts by result
//! - `block_page_cache_errors_total` (counter): swallowed store failures by op
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(format: &'static str, status: u16) {
    counter!(
        "block_page_requests_total",
        "format" => format,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_lookup(outcome: &'static str) {
    counter!("block_page_rule_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream_attempt(result: &'static str) {
    counter!("block_page_upstream_attempts_total", "result" => result).increment(1);
}

pub fn record_cache_error(op: &'static str) {
    counter!("block_page_cache_errors_total", "op" => op).increment(1);
}
