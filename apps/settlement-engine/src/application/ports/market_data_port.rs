//! Market Data Port (Driven Port)
//!
//! Read-only access to scraped market snapshots.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::market::MarketSnapshot;
use crate::domain::shared::Money;

/// Port for market snapshots.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// The most recent snapshot for every security.
    async fn latest_snapshot_per_security(&self) -> Result<Vec<MarketSnapshot>, StoreError>;

    /// Latest closing price for `symbol`, if it has been scraped.
    async fn latest_closing_price(&self, symbol: &str) -> Result<Option<Money>, StoreError> {
        let latest = self.latest_snapshot_per_security().await?;
        Ok(latest
            .into_iter()
            .find(|s| s.security.eq_ignore_ascii_case(symbol))
            .map(|s| s.closing))
    }
}
