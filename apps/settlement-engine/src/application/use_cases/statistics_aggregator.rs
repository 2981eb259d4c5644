//! Statistics Aggregator
//!
//! Read-only period statistics over commissions and transactions, and market
//! statistics over the latest snapshot per security. Nothing is cached.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::dto::StatsQuery;
use crate::application::ports::{
    CommissionFilter, MarketDataPort, SettlementStore, TransactionFilter,
};
use crate::domain::access::{Action, Actor};
use crate::domain::market::{MarketStats, latest_per_security};
use crate::domain::shared::{Timestamp, UserId};
use crate::domain::statistics::{CommissionStats, StatsPeriod, TransactionStats};
use crate::error::SettlementError;

/// Statistics use cases.
pub struct StatisticsAggregator<S, M>
where
    S: SettlementStore,
    M: MarketDataPort,
{
    store: Arc<S>,
    market: Arc<M>,
}

impl<S, M> StatisticsAggregator<S, M>
where
    S: SettlementStore,
    M: MarketDataPort,
{
    /// Create a new `StatisticsAggregator`.
    pub const fn new(store: Arc<S>, market: Arc<M>) -> Self {
        Self { store, market }
    }

    /// Commission statistics for the actor. Brokers only see their own.
    pub async fn commission_stats(
        &self,
        actor: &Actor,
        query: StatsQuery,
    ) -> Result<CommissionStats, SettlementError> {
        actor.authorize(Action::ViewCommissionStats)?;
        let broker_id = scoped_broker(actor, query.broker_id);
        self.commission_stats_for_period(broker_id.as_ref(), query.period, Utc::now())
            .await
    }

    /// Transaction statistics for the actor. Brokers only see their own.
    pub async fn transaction_stats(
        &self,
        actor: &Actor,
        query: StatsQuery,
    ) -> Result<TransactionStats, SettlementError> {
        actor.authorize(Action::ViewTransactionStats)?;
        let broker_id = scoped_broker(actor, query.broker_id);
        self.transaction_stats_for_period(broker_id.as_ref(), query.period, Utc::now())
            .await
    }

    /// Commission statistics for records created in `period` as of `now`.
    pub async fn commission_stats_for_period(
        &self,
        broker_id: Option<&UserId>,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Result<CommissionStats, SettlementError> {
        let filter = CommissionFilter {
            broker_id: broker_id.cloned(),
            created_from: Some(Timestamp::new(period.lower_bound(now))),
            ..Default::default()
        };
        let commissions = self.store.find_commissions(&filter).await?;
        Ok(CommissionStats::tally(&commissions))
    }

    /// Transaction statistics for records created in `period` as of `now`.
    pub async fn transaction_stats_for_period(
        &self,
        broker_id: Option<&UserId>,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Result<TransactionStats, SettlementError> {
        let filter = TransactionFilter {
            broker_id: broker_id.cloned(),
            created_from: Some(Timestamp::new(period.lower_bound(now))),
            ..Default::default()
        };
        let transactions = self.store.find_transactions(&filter).await?;
        Ok(TransactionStats::tally(&transactions))
    }

    /// Market statistics over the latest snapshot of every security.
    pub async fn market_stats(&self, actor: &Actor) -> Result<MarketStats, SettlementError> {
        actor.authorize(Action::ViewMarketStats)?;
        self.market_stats_for_latest().await
    }

    /// Market statistics without an access check.
    pub async fn market_stats_for_latest(&self) -> Result<MarketStats, SettlementError> {
        let snapshots = self.market.latest_snapshot_per_security().await?;
        // adapters may hand back history
        let latest = latest_per_security(&snapshots);
        Ok(MarketStats::compute(&latest))
    }
}

/// Admins may pick any broker (or none); brokers are pinned to themselves.
fn scoped_broker(actor: &Actor, requested: Option<UserId>) -> Option<UserId> {
    if actor.is_admin() {
        requested
    } else {
        Some(actor.user_id.clone())
    }
}
