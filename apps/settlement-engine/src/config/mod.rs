//! Configuration module for the settlement engine.
//!
//! YAML configuration with `${VAR}` and `${VAR:-default}` environment
//! interpolation, validated on load.
//!
//! # Usage
//!
//! ```rust,ignore
//! use settlement_engine::config::load_config;
//!
//! let config = load_config(Some("config.yaml"))?;
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod commission;
mod observability;
mod seed;
mod server;
mod settlement;

use std::net::SocketAddr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use commission::CommissionConfig;
pub use observability::{LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use seed::SeedConfig;
pub use server::ServerConfig;
pub use settlement::SettlementConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("cannot read settlement config {path}: {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("settlement config is not valid YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("invalid settlement config: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Commission defaults.
    #[serde(default)]
    pub commission: CommissionConfig,
    /// Settlement switches.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Seed fixture.
    #[serde(default)]
    pub seed: SeedConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Read, interpolate and validate `path` (`config.yaml` when `None`).
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Interpolate and validate an in-memory YAML document.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-default}`; unset or empty variables take the default.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    let rate = config.commission.default_rate;
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(ConfigError::ValidationError(
            "commission.default_rate must be between 0 and 100".to_string(),
        ));
    }

    let pages = &config.commission;
    if pages.default_page_size == 0 || pages.default_page_size > pages.max_page_size {
        return Err(ConfigError::ValidationError(
            "commission.default_page_size must be between 1 and max_page_size".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !matches!(format, "json" | "pretty") {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format '{format}' is neither json nor pretty"
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.listen_addr.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.metrics.listen_addr '{}' is not a socket address",
            metrics.listen_addr
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = load_config_from_string("{}").unwrap();
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.commission.default_rate, Decimal::ZERO);
        assert_eq!(config.commission.default_page_size, 10);
        assert!(!config.settlement.restore_inventory_on_cancel);
        assert!(!config.observability.metrics.enabled);
        assert!(config.seed.path.is_none());
    }

    #[test]
    fn full_config_parse() {
        let yaml = r#"
server:
  http_port: 3000
  bind_address: "127.0.0.1"
commission:
  default_rate: 1.25
  default_page_size: 20
  max_page_size: 50
settlement:
  restore_inventory_on_cancel: true
observability:
  logging:
    level: debug
    format: pretty
  metrics:
    enabled: true
    listen_addr: "127.0.0.1:9100"
seed:
  path: fixtures/seed.yaml
"#;
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.commission.default_rate, dec!(1.25));
        assert_eq!(config.commission.max_page_size, 50);
        assert!(config.settlement.restore_inventory_on_cancel);
        assert_eq!(config.observability.logging.format, "pretty");
        assert_eq!(config.seed.path.as_deref(), Some("fixtures/seed.yaml"));
    }

    #[test]
    fn env_var_with_default_when_missing() {
        let input = "level: ${SETTLEMENT_CONFIG_TEST_NONEXISTENT_VAR:-warn}";
        assert_eq!(interpolate_env_vars(input), "level: warn");
    }

    #[test]
    fn env_var_without_default_becomes_empty() {
        let input = "path: ${SETTLEMENT_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "path: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn env_var_uses_existing_value() {
        let result = interpolate_env_vars("path: ${PATH:-default}");
        assert_ne!(result, "path: default");
    }

    #[test]
    fn rejects_rate_above_hundred() {
        let err = load_config_from_string("commission:\n  default_rate: 150\n").unwrap_err();
        assert!(err.to_string().contains("default_rate"));
    }

    #[test]
    fn rejects_page_size_above_max() {
        let yaml = "commission:\n  default_page_size: 200\n  max_page_size: 100\n";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("default_page_size"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let yaml = "observability:\n  logging:\n    format: xml\n";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn rejects_bad_metrics_address_only_when_enabled() {
        let off = "observability:\n  metrics:\n    listen_addr: nowhere\n";
        assert!(load_config_from_string(off).is_ok());
        let on = "observability:\n  metrics:\n    enabled: true\n    listen_addr: nowhere\n";
        assert!(load_config_from_string(on).is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"server:\n  http_port: 9999\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.http_port, 9999);
    }

    #[test]
    fn load_config_missing_file() {
        let err = load_config(Some("/nonexistent/settlement.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
