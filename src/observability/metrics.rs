//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hibernator_state_transitions_total` (counter): by `from`, `to`
//! - `hibernator_state` (gauge): numeric code of the current lifecycle state
//! - `hibernator_heartbeats_total` (counter): accepted health reports
//! - `hibernator_launches_total` (counter): successful backend spawns
//! - `hibernator_gate_decisions_total` (counter): by `decision`
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::hibernation::LifecycleState;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_transition(from: LifecycleState, to: LifecycleState) {
    metrics::counter!(
        "hibernator_state_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    metrics::gauge!("hibernator_state").set(to.code() as f64);
}

pub fn record_heartbeat() {
    metrics::counter!("hibernator_heartbeats_total").increment(1);
}

pub fn record_launch() {
    metrics::counter!("hibernator_launches_total").increment(1);
}

pub fn record_gate_decision(decision: &'static str) {
    metrics::counter!("hibernator_gate_decisions_total", "decision" => decision).increment(1);
}
