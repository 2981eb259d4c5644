//! Commission defaults and listing limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Commission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    /// Percentage applied when neither the request nor the broker has a rate.
    #[serde(default)]
    pub default_rate: Decimal,
    /// Page size when a listing gives none.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest accepted page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            default_rate: Decimal::ZERO,
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

const fn default_page_size() -> u32 {
    10
}

const fn default_max_page_size() -> u32 {
    100
}
