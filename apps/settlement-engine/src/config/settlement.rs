//! Settlement behaviour switches.

use serde::{Deserialize, Serialize};

/// Settlement configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Return released shares to the company when a buy transaction in
    /// `shares_released` is cancelled.
    #[serde(default)]
    pub restore_inventory_on_cancel: bool,
}
