//! Seed fixture location.

use serde::{Deserialize, Serialize};

/// Seed configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// YAML fixture with users, companies and market snapshots.
    #[serde(default)]
    pub path: Option<String>,
}
