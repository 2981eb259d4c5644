//! Seed fixtures for the in-memory adapters.
//!
//! A YAML document with users, companies and market snapshots:
//!
//! ```yaml
//! users:
//!   - id: admin
//!     role: admin
//!     name: Admin
//!     email: admin@example.com
//! companies:
//!   - id: nabil
//!     name: Nabil Bank
//!     symbol: NABIL
//!     numberOfShares: 1000
//!     status: approved
//! marketSnapshots: []
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::application::ports::UserProfile;
use crate::domain::inventory::Company;
use crate::domain::market::MarketSnapshot;

/// Seed loading error.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path.
        path: String,
        /// Cause.
        source: std::io::Error,
    },
    /// The YAML could not be parsed.
    #[error("failed to parse seed data: {0}")]
    Parse(String),
}

/// Fixture data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    /// User directory entries.
    #[serde(default)]
    pub users: Vec<UserProfile>,
    /// Companies and their inventory.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Market snapshot history.
    #[serde(default)]
    pub market_snapshots: Vec<MarketSnapshot>,
}

impl SeedData {
    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        serde_yaml_bw::from_str(content).map_err(|e| SeedError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Role;
    use crate::domain::shared::ShareCount;
    use std::io::Write;

    const SEED: &str = r#"
users:
  - id: agent-1
    role: agent
    name: Sita Agent
    email: sita@example.com
    commissionRate: 1.5
  - id: client-1
    role: client
    name: Ram Client
    email: ram@example.com
companies:
  - id: nabil
    name: Nabil Bank
    symbol: NABIL
    numberOfShares: 100
    status: approved
marketSnapshots:
  - security: NABIL
    closing: 512.5
    previous: 500
    change: 2.5
    volume: 12000
    value: 6150000
    scrapedAt: "2025-03-14T09:15:00Z"
"#;

    #[test]
    fn parses_fixture() {
        let seed = SeedData::from_yaml(SEED).unwrap();
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.users[0].role, Role::Agent);
        assert!(seed.users[0].commission_rate.is_some());
        assert!(seed.users[1].commission_rate.is_none());
        assert_eq!(seed.companies[0].number_of_shares(), ShareCount::new(100));
        assert_eq!(seed.market_snapshots[0].volume, 12000);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();
        let seed = SeedData::load(file.path()).unwrap();
        assert_eq!(seed.companies[0].symbol(), "NABIL");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SeedData::load("/nonexistent/seed.yaml").unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
