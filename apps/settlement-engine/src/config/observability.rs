//! Log output and Prometheus exporter settings.

use serde::{Deserialize, Serialize};

/// `observability:` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Subscriber settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Prometheus exporter configuration.
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// Console log subscriber settings. `RUST_LOG` overrides `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level applied to this crate and the HTTP trace layer.
    #[serde(default = "info_level")]
    pub level: String,
    /// Output format: `json` or `pretty`.
    #[serde(default = "json_format")]
    pub format: String,
    /// Attach the current span and span list to JSON lines.
    #[serde(default = "enabled")]
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: info_level(),
            format: json_format(),
            include_spans: true,
        }
    }
}

/// Prometheus exporter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Start the exporter.
    #[serde(default)]
    pub enabled: bool,
    /// Listener address.
    #[serde(default = "exporter_addr")]
    pub listen_addr: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: exporter_addr(),
        }
    }
}

fn info_level() -> String {
    "info".to_string()
}

fn json_format() -> String {
    "json".to_string()
}

fn exporter_addr() -> String {
    "0.0.0.0:9090".to_string()
}

const fn enabled() -> bool {
    true
}
