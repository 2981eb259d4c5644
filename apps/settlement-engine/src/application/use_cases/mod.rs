//! Use Cases
//!
//! The three engines plus the read-only statistics aggregator.

mod commission_engine;
mod statistics_aggregator;
mod transaction_engine;

use std::time::Instant;

pub use commission_engine::{CommissionEngine, CommissionSettings};
pub use statistics_aggregator::StatisticsAggregator;
pub use transaction_engine::{TransactionEngine, TransactionSettings};

use crate::error::SettlementError;
use crate::observability::record_operation;

fn observe<T>(operation: &str, started: Instant, result: &Result<T, SettlementError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.code().reason(),
    };
    record_operation(operation, outcome, started.elapsed().as_secs_f64());
}
