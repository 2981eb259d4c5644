//! Settlement Engine Binary
//!
//! Starts the settlement engine over the in-memory adapters.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin settlement-engine -- config.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `SETTLEMENT_CONFIG`: Config file path when none is given (default: `config.yaml`)
//! - `OTEL_ENABLED`: Set to `false` to disable OpenTelemetry export
//! - `RUST_LOG`: Log filter override

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use settlement_engine::config::{Config, load_config};
use settlement_engine::infrastructure::http::create_router;
use settlement_engine::infrastructure::persistence::SeedData;
use settlement_engine::observability::start_exporter;
use settlement_engine::telemetry::init_telemetry;
use settlement_engine::InMemoryContainer;
use tokio::net::TcpListener;
use tokio::signal;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SETTLEMENT_CONFIG").ok());
    let config = load_config(config_path.as_deref()).context("loading configuration")?;

    let _telemetry = init_telemetry(&config.observability.logging);
    tracing::info!("Starting Settlement Engine");
    log_config(&config);

    start_metrics(&config);

    let seed = load_seed(&config)?;
    let container = InMemoryContainer::in_memory(&config, seed).context("wiring container")?;
    let app = create_router(container.app_state(env!("CARGO_PKG_VERSION")));

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.http_port)
        .parse()
        .context("parsing server address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, "HTTP server starting");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("Settlement engine stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &Config) {
    tracing::info!(
        http_port = config.server.http_port,
        bind_address = %config.server.bind_address,
        default_rate = %config.commission.default_rate,
        restore_inventory_on_cancel = config.settlement.restore_inventory_on_cancel,
        metrics_enabled = config.observability.metrics.enabled,
        seed = config.seed.path.as_deref().unwrap_or("-"),
        "Configuration loaded"
    );
}

/// Start the Prometheus exporter when enabled. Failure is logged, not fatal.
fn start_metrics(config: &Config) {
    let metrics = &config.observability.metrics;
    if !metrics.enabled {
        return;
    }
    let Ok(addr) = metrics.listen_addr.parse::<SocketAddr>() else {
        tracing::warn!(addr = %metrics.listen_addr, "Invalid metrics address, metrics disabled");
        return;
    };
    if let Err(e) = start_exporter(addr) {
        tracing::warn!(error = %e, "Failed to start metrics exporter, continuing without it");
    }
}

fn load_seed(config: &Config) -> anyhow::Result<SeedData> {
    match config.seed.path.as_deref() {
        Some(path) => {
            let seed = SeedData::load(path).with_context(|| format!("loading seed {path}"))?;
            tracing::info!(
                users = seed.users.len(),
                companies = seed.companies.len(),
                snapshots = seed.market_snapshots.len(),
                "Seed data loaded"
            );
            Ok(seed)
        }
        None => {
            tracing::warn!("No seed configured, starting with empty stores");
            Ok(SeedData::default())
        }
    }
}

/// Resolve on Ctrl+C or SIGTERM. A handler that fails to install is logged
/// and never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let source = tokio::select! {
        () = interrupt => "ctrl_c",
        () = terminate => "sigterm",
    };

    tracing::info!(
        signal = source,
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
