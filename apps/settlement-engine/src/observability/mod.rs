//! Settlement metrics.
//!
//! Tracing and the OpenTelemetry pipeline live in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    ExporterError, record_inventory_rejection, record_notification_failure, record_operation,
    record_status_transition, start_exporter, update_available_shares,
};
