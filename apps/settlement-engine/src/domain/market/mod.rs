//! Market data read models and statistics.

mod snapshot;
mod stats;

pub use snapshot::{MarketSnapshot, latest_per_security};
pub use stats::{MarketStats, SecurityHighlight};
