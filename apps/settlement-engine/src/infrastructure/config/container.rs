//! Dependency Injection Container
//!
//! Wires ports, settings and engines together.

use std::sync::Arc;

use crate::application::dto::PageSettings;
use crate::application::ports::{
    MarketDataPort, NotificationPort, SettlementStore, UserDirectoryPort,
};
use crate::application::services::Directory;
use crate::application::use_cases::{
    CommissionEngine, CommissionSettings, StatisticsAggregator, TransactionEngine,
    TransactionSettings,
};
use crate::config::{Config, ConfigError};
use crate::domain::shared::CommissionRate;
use crate::infrastructure::http::AppState;
use crate::infrastructure::market_data::InMemoryMarketData;
use crate::infrastructure::notification::LoggingNotifier;
use crate::infrastructure::persistence::{
    InMemorySettlementStore, InMemoryUserDirectory, SeedData,
};

/// Container over the in-memory adapters.
pub type InMemoryContainer =
    Container<InMemorySettlementStore, InMemoryUserDirectory, LoggingNotifier, InMemoryMarketData>;

/// Dependency injection container.
pub struct Container<S, U, N, M>
where
    S: SettlementStore + 'static,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort + 'static,
{
    store: Arc<S>,
    users: Arc<U>,
    notifier: Arc<N>,
    market: Arc<M>,
    commission_settings: CommissionSettings,
    transaction_settings: TransactionSettings,
}

impl<S, U, N, M> Container<S, U, N, M>
where
    S: SettlementStore + 'static,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort + 'static,
{
    /// Create a container from adapters and configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the default commission rate
    /// is out of range.
    pub fn new(
        store: Arc<S>,
        users: Arc<U>,
        notifier: Arc<N>,
        market: Arc<M>,
        config: &Config,
    ) -> Result<Self, ConfigError> {
        let default_rate = CommissionRate::new(config.commission.default_rate)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        let pages = PageSettings {
            default_limit: config.commission.default_page_size,
            max_limit: config.commission.max_page_size,
        };

        Ok(Self {
            store,
            users,
            notifier,
            market,
            commission_settings: CommissionSettings {
                default_rate,
                pages,
            },
            transaction_settings: TransactionSettings {
                restore_inventory_on_cancel: config.settlement.restore_inventory_on_cancel,
                pages,
            },
        })
    }

    /// Get the settlement store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Get the user directory.
    pub fn users(&self) -> Arc<U> {
        Arc::clone(&self.users)
    }

    /// Create a `CommissionEngine`.
    pub fn commission_engine(&self) -> CommissionEngine<S, U, N> {
        CommissionEngine::new(
            Arc::clone(&self.store),
            Arc::clone(&self.users),
            Arc::clone(&self.notifier),
            self.commission_settings,
        )
    }

    /// Create a `TransactionEngine`.
    pub fn transaction_engine(&self) -> TransactionEngine<S, U, N, M> {
        TransactionEngine::new(
            Arc::clone(&self.store),
            Arc::clone(&self.users),
            Arc::clone(&self.notifier),
            Arc::clone(&self.market),
            self.transaction_settings,
        )
    }

    /// Create a `StatisticsAggregator`.
    pub fn statistics_aggregator(&self) -> StatisticsAggregator<S, M> {
        StatisticsAggregator::new(Arc::clone(&self.store), Arc::clone(&self.market))
    }

    /// HTTP state over freshly built engines.
    pub fn app_state(&self, version: impl Into<String>) -> AppState<S, U, N, M> {
        AppState {
            commissions: Arc::new(self.commission_engine()),
            transactions: Arc::new(self.transaction_engine()),
            statistics: Arc::new(self.statistics_aggregator()),
            directory: Directory::new(Arc::clone(&self.users)),
            version: version.into(),
        }
    }
}

impl InMemoryContainer {
    /// In-memory adapters loaded with `seed`, notifications logged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn in_memory(config: &Config, seed: SeedData) -> Result<Self, ConfigError> {
        Self::new(
            Arc::new(InMemorySettlementStore::with_companies(seed.companies)),
            Arc::new(InMemoryUserDirectory::with_users(seed.users)),
            Arc::new(LoggingNotifier),
            Arc::new(InMemoryMarketData::with_snapshots(seed.market_snapshots)),
            config,
        )
    }
}
