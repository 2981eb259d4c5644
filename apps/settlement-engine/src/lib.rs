// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Settlement Engine - Rust Core Library
//!
//! Commission and share-transaction lifecycle for a brokered share
//! marketplace.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `inventory`: company share counts and the inventory guard
//!   - `commission`: commission aggregate, status lifecycle, derived amounts
//!   - `transaction`: buy/sell aggregate and its per-kind state machine
//!   - `statistics`, `market`: period and market aggregates
//!   - `access`: roles and the capability table
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: settlement store, user directory, notifications, market data
//!   - `use_cases`: `CommissionEngine`, `TransactionEngine`, `StatisticsAggregator`
//!   - `dto`: read models and listing inputs
//!
//! - **Infrastructure**: Adapters
//!   - `persistence`: in-memory store with units of work, seed fixtures
//!   - `http`: REST API
//!   - `config`: dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration.
pub mod config;

/// Error taxonomy.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing and OpenTelemetry setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::use_cases::{CommissionEngine, StatisticsAggregator, TransactionEngine};
pub use error::{ErrorCode, SettlementError};
pub use infrastructure::config::{Container, InMemoryContainer};
pub use infrastructure::http::{AppState, create_router};
