//! Prometheus metrics for the settlement engine.
//!
//! Counters for lifecycle transitions, inventory rejections and notification
//! failures, plus an operation latency histogram. Without an installed
//! recorder every call is a no-op.

use metrics::{
    Unit, counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

const STATUS_TRANSITIONS: &str = "settlement_status_transitions_total";
const INVENTORY_REJECTIONS: &str = "settlement_inventory_rejections_total";
const AVAILABLE_SHARES: &str = "settlement_available_shares";
const NOTIFICATION_FAILURES: &str = "settlement_notification_failures_total";
const OPERATION_DURATION: &str = "settlement_operation_duration_seconds";

/// Engine operations are lock-bound store calls: 500µs to 1s.
const OPERATION_BUCKETS: &[f64] = &[0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0];

/// Exporter startup failure.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// Bucket layout rejected by the builder.
    #[error("invalid histogram buckets: {0}")]
    Buckets(String),
    /// Listener could not be installed, usually a port clash.
    #[error("cannot serve metrics on {addr}: {reason}")]
    Install {
        /// Listener address.
        addr: SocketAddr,
        /// Builder error.
        reason: String,
    },
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// # Errors
///
/// Returns an error if the recorder or its listener cannot be installed.
pub fn start_exporter(addr: SocketAddr) -> Result<(), ExporterError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(OPERATION_BUCKETS)
        .map_err(|e| ExporterError::Buckets(e.to_string()))?
        .install()
        .map_err(|e| ExporterError::Install {
            addr,
            reason: e.to_string(),
        })?;

    describe_settlement_metrics();
    tracing::info!(%addr, "Settlement metrics exporter listening");
    Ok(())
}

fn describe_settlement_metrics() {
    describe_counter!(STATUS_TRANSITIONS, "Committed commission and transaction status changes");
    describe_counter!(INVENTORY_REJECTIONS, "Requests refused for lack of company shares");
    describe_gauge!(AVAILABLE_SHARES, "Shares a company still holds after the last release");
    describe_counter!(NOTIFICATION_FAILURES, "Notifications the transport could not deliver");
    describe_histogram!(OPERATION_DURATION, Unit::Seconds, "Engine operation wall time");
}

// ============================================================================
// Lifecycle Metrics
// ============================================================================

/// Record a committed status transition.
///
/// # Arguments
///
/// * `entity` - `"commission"` or `"transaction"`
/// * `from` - Previous status
/// * `to` - New status
pub fn record_status_transition(entity: &str, from: &str, to: &str) {
    counter!(
        STATUS_TRANSITIONS,
        "entity" => entity.to_string(),
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record a request refused for lack of inventory.
///
/// # Arguments
///
/// * `stage` - `"check"` for read-only checks, `"release"` for decrements
pub fn record_inventory_rejection(stage: &str) {
    counter!(
        INVENTORY_REJECTIONS,
        "stage" => stage.to_string()
    )
    .increment(1);
}

/// Update the available-shares gauge for a company after a committed change.
pub fn update_available_shares(company_id: &str, shares: u64) {
    #[allow(clippy::cast_precision_loss)]
    gauge!(AVAILABLE_SHARES, "company" => company_id.to_string()).set(shares as f64);
}

/// Record a notification that could not be delivered.
pub fn record_notification_failure(kind: &str) {
    counter!(
        NOTIFICATION_FAILURES,
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record how long an engine operation took.
///
/// # Arguments
///
/// * `operation` - Operation name (e.g., `"commission.update_status"`)
/// * `outcome` - `"ok"` or the error code
/// * `latency_seconds` - Wall time in seconds
pub fn record_operation(operation: &str, outcome: &str, latency_seconds: f64) {
    histogram!(
        OPERATION_DURATION,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(latency_seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_buckets_are_ascending() {
        assert!(OPERATION_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn recording_without_recorder_does_not_panic() {
        record_status_transition("commission", "pending", "completed");
        record_inventory_rejection("release");
        update_available_shares("nabil", 50);
        record_notification_failure("COMMISSION_CREATED");
        record_operation("commission.create", "ok", 0.002);
    }
}
