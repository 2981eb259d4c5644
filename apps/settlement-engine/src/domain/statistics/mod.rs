//! Period statistics.

mod period;
mod summary;

pub use period::StatsPeriod;
pub use summary::{CommissionStats, TransactionStats};
