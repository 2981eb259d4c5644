//! Snapshot history held in memory.
//!
//! The scraper that fills it in production is an external collaborator;
//! here snapshots come from seed data or [`InMemoryMarketData::record`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{MarketDataPort, StoreError};
use crate::domain::market::{MarketSnapshot, latest_per_security};

/// Market data adapter over an in-memory snapshot history.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    history: Arc<RwLock<Vec<MarketSnapshot>>>,
}

impl InMemoryMarketData {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history from existing snapshots.
    #[must_use]
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = MarketSnapshot>) -> Self {
        Self {
            history: Arc::new(RwLock::new(snapshots.into_iter().collect())),
        }
    }

    /// Append a scraped snapshot.
    pub async fn record(&self, snapshot: MarketSnapshot) {
        self.history.write().await.push(snapshot);
    }
}

#[async_trait]
impl MarketDataPort for InMemoryMarketData {
    async fn latest_snapshot_per_security(&self) -> Result<Vec<MarketSnapshot>, StoreError> {
        let history = self.history.read().await;
        Ok(latest_per_security(history.iter()))
    }
}
