//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mvc_dispatch_total` (counter): dispatches by verb and outcome
//! - `mvc_dispatch_duration_seconds` (histogram): dispatch latency
//! - `mvc_routes_loaded` (gauge): patterns in the active route table
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Outcome labels come from `RouterError::kind`, so cardinality is fixed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatch.
pub fn record_dispatch(verb: &str, outcome: &'static str, start: Instant) {
    metrics::counter!("mvc_dispatch_total", "verb" => verb.to_string(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("mvc_dispatch_duration_seconds", "verb" => verb.to_string(), "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the active route table.
pub fn record_routes_loaded(count: usize) {
    metrics::gauge!("mvc_routes_loaded").set(count as f64);
}
