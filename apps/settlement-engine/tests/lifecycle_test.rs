//! Lifecycle Integration Tests
//!
//! Drives the commission and transaction engines against the in-memory
//! adapters: inventory release, terminal immutability, concurrency, access
//! control, period statistics and notifications.

#![allow(clippy::unwrap_used, clippy::too_many_lines)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal_macros::dec;

use settlement_engine::application::dto::{
    CommissionListQuery, CreateCommissionInput, CreateTransactionInput, StatsQuery,
};
use settlement_engine::application::ports::{SettlementStore, UserProfile};
use settlement_engine::application::use_cases::{
    CommissionEngine, CommissionSettings, StatisticsAggregator, TransactionEngine,
    TransactionSettings,
};
use settlement_engine::domain::access::{Actor, Role};
use settlement_engine::domain::commission::{
    AmendCommissionCommand, Commission, CommissionStatus, ReconstitutedCommissionParams,
};
use settlement_engine::domain::inventory::{Company, CompanyStatus};
use settlement_engine::domain::market::MarketSnapshot;
use settlement_engine::domain::shared::{
    CommissionId, CommissionRate, CompanyId, Money, ShareCount, Timestamp, TransactionId, UserId,
};
use settlement_engine::domain::statistics::StatsPeriod;
use settlement_engine::domain::transaction::{
    AmendTransactionCommand, ReconstitutedTransactionParams, ShareTransaction, TransactionStatus,
    TransactionType,
};
use settlement_engine::infrastructure::market_data::InMemoryMarketData;
use settlement_engine::infrastructure::notification::RecordingNotifier;
use settlement_engine::infrastructure::persistence::{
    InMemorySettlementStore, InMemoryUserDirectory,
};
use settlement_engine::SettlementError;

// =============================================================================
// Harness
// =============================================================================

type Commissions =
    CommissionEngine<InMemorySettlementStore, InMemoryUserDirectory, RecordingNotifier>;
type Transactions = TransactionEngine<
    InMemorySettlementStore,
    InMemoryUserDirectory,
    RecordingNotifier,
    InMemoryMarketData,
>;

struct Harness {
    store: Arc<InMemorySettlementStore>,
    notifier: Arc<RecordingNotifier>,
    market: Arc<InMemoryMarketData>,
    commissions: Arc<Commissions>,
    transactions: Arc<Transactions>,
    stats: StatisticsAggregator<InMemorySettlementStore, InMemoryMarketData>,
}

const COMPANY: &str = "nabil";

fn user(id: &str, role: Role, rate: Option<rust_decimal::Decimal>) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        role,
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        commission_rate: rate.map(|r| CommissionRate::new(r).unwrap()),
    }
}

fn harness_with(shares: u64, restore_inventory_on_cancel: bool) -> Harness {
    let store = Arc::new(InMemorySettlementStore::with_companies([Company::new(
        CompanyId::new(COMPANY),
        "Nabil Bank Limited",
        "NABIL",
        ShareCount::new(shares),
        CompanyStatus::Approved,
    )]));
    let users = Arc::new(InMemoryUserDirectory::with_users([
        user("admin", Role::Admin, None),
        user("b1", Role::Teller, Some(dec!(1.5))),
        user("b2", Role::Agent, None),
        user("c1", Role::Client, None),
        user("c2", Role::Client, None),
    ]));
    let notifier = Arc::new(RecordingNotifier::new());
    let market = Arc::new(InMemoryMarketData::new());

    let commissions = Arc::new(CommissionEngine::new(
        Arc::clone(&store),
        Arc::clone(&users),
        Arc::clone(&notifier),
        CommissionSettings::default(),
    ));
    let transactions = Arc::new(TransactionEngine::new(
        Arc::clone(&store),
        Arc::clone(&users),
        Arc::clone(&notifier),
        Arc::clone(&market),
        TransactionSettings {
            restore_inventory_on_cancel,
            ..Default::default()
        },
    ));
    let stats = StatisticsAggregator::new(Arc::clone(&store), Arc::clone(&market));

    Harness {
        store,
        notifier,
        market,
        commissions,
        transactions,
        stats,
    }
}

fn harness(shares: u64) -> Harness {
    harness_with(shares, false)
}

fn admin() -> Actor {
    Actor::new("admin", Role::Admin)
}

fn broker() -> Actor {
    Actor::new("b1", Role::Teller)
}

fn other_broker() -> Actor {
    Actor::new("b2", Role::Agent)
}

fn client() -> Actor {
    Actor::new("c1", Role::Client)
}

fn commission_input(shares: u64) -> CreateCommissionInput {
    CreateCommissionInput {
        broker_id: None,
        customer_id: Some(UserId::new("c1")),
        company_id: CompanyId::new(COMPANY),
        number_of_shares: ShareCount::new(shares),
        price_per_share: Money::from_units(100),
        commission_rate: Some(CommissionRate::new(dec!(2)).unwrap()),
        notes: None,
    }
}

fn buy_input(shares: u64) -> CreateTransactionInput {
    CreateTransactionInput {
        transaction_type: TransactionType::Buy,
        user_id: None,
        broker_id: UserId::new("b1"),
        company_id: CompanyId::new(COMPANY),
        requested_shares: ShareCount::new(shares),
        agreed_price_per_share: Money::from_units(100),
        notes: None,
    }
}

impl Harness {
    async fn available(&self) -> ShareCount {
        self.store
            .find_company(&CompanyId::new(COMPANY))
            .await
            .unwrap()
            .unwrap()
            .number_of_shares()
    }

    async fn new_commission(&self, shares: u64) -> CommissionId {
        self.commissions
            .create(&broker(), commission_input(shares))
            .await
            .unwrap()
            .id
    }
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[tokio::test]
async fn completing_a_commission_releases_its_shares() {
    let h = harness(100);
    let id = h.new_commission(50).await;

    let view = h
        .commissions
        .update_status(&broker(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap();

    assert_eq!(view.status, CommissionStatus::Completed);
    assert_eq!(h.available().await, ShareCount::new(50));
}

#[tokio::test]
async fn completion_beyond_inventory_is_refused_without_writes() {
    let h = harness(100);
    // both fit at creation time; nothing is reserved
    let first = h.new_commission(60).await;
    let second = h.new_commission(60).await;

    h.commissions
        .update_status(&broker(), &first, CommissionStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(h.available().await, ShareCount::new(40));

    let err = h
        .commissions
        .update_status(&broker(), &second, CommissionStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::InsufficientShares { .. }));
    assert_eq!(h.available().await, ShareCount::new(40));

    let unchanged = h.commissions.get(&broker(), &second).await.unwrap();
    assert_eq!(unchanged.status, CommissionStatus::Pending);

    // restocked outside the engines, the same completion now goes through
    h.store
        .insert_company(Company::new(
            CompanyId::new(COMPANY),
            "Nabil Bank Limited",
            "NABIL",
            ShareCount::new(100),
            CompanyStatus::Approved,
        ))
        .await;
    h.commissions
        .update_status(&broker(), &second, CommissionStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(h.available().await, ShareCount::new(40));
}

#[tokio::test]
async fn creation_checks_remaining_inventory() {
    let h = harness(100);
    let first = h.new_commission(50).await;
    h.commissions
        .update_status(&broker(), &first, CommissionStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(h.available().await, ShareCount::new(50));

    let err = h
        .commissions
        .create(&broker(), commission_input(60))
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::InsufficientShares { .. }));
    assert_eq!(h.available().await, ShareCount::new(50));
}

#[tokio::test]
async fn buy_transaction_starts_pending_with_total_value() {
    let h = harness(100);
    h.market
        .record(MarketSnapshot {
            security: "NABIL".to_string(),
            closing: Money::from_units(98),
            previous: Money::from_units(97),
            change: dec!(1.03),
            volume: 500,
            value: Money::from_units(49_000),
            scraped_at: Timestamp::now(),
        })
        .await;

    let view = h.transactions.create(&client(), buy_input(10)).await.unwrap();

    assert_eq!(view.total_transaction_value, Money::from_units(1_000));
    assert_eq!(view.status, TransactionStatus::PendingBrokerApproval);
    assert_eq!(view.user_id, UserId::new("c1"));
    assert_eq!(view.market_price_at_transaction, Some(Money::from_units(98)));
}

#[tokio::test]
async fn payment_proof_is_accepted_once() {
    let h = harness(100);
    let id = h.transactions.create(&client(), buy_input(10)).await.unwrap().id;
    h.transactions
        .update_status(&broker(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap();

    let view = h
        .transactions
        .upload_payment_proof(&client(), &id, "https://files.example.com/p1.png".to_string())
        .await
        .unwrap();
    assert_eq!(view.status, TransactionStatus::PaymentConfirmed);
    assert_eq!(
        view.payment_proof_url.as_deref(),
        Some("https://files.example.com/p1.png")
    );

    let err = h
        .transactions
        .upload_payment_proof(&client(), &id, "https://files.example.com/p2.png".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::InvalidTransition { .. }));
}

#[tokio::test]
async fn month_statistics_only_count_records_from_this_month() {
    let h = harness(1_000);

    let recent = h.new_commission(10).await;
    h.commissions
        .update_status(&broker(), &recent, CommissionStatus::Completed, None)
        .await
        .unwrap();
    h.new_commission(5).await;

    let long_ago = Timestamp::new(Utc::now() - ChronoDuration::days(400));
    h.store
        .insert_commission(Commission::reconstitute(ReconstitutedCommissionParams {
            id: CommissionId::new("old-1"),
            broker_id: UserId::new("b1"),
            customer_id: UserId::new("c1"),
            company_id: CompanyId::new(COMPANY),
            number_of_shares: ShareCount::new(200),
            price_per_share: Money::from_units(100),
            commission_rate: CommissionRate::new(dec!(2)).unwrap(),
            status: CommissionStatus::Completed,
            notes: None,
            created_by: UserId::new("b1"),
            created_at: long_ago,
            updated_at: long_ago,
        }).unwrap())
        .await;

    let month = h
        .stats
        .commission_stats_for_period(None, StatsPeriod::Month, Utc::now())
        .await
        .unwrap();
    assert_eq!(month.total_commissions, 2);
    assert_eq!(month.completed_commissions, 1);
    assert_eq!(month.pending_commissions, 1);
    assert_eq!(month.total_transaction_value, Money::from_units(1_000));
    assert_eq!(month.total_commission_amount, Money::from_units(20));

    let all = h
        .stats
        .commission_stats_for_period(None, StatsPeriod::All, Utc::now())
        .await
        .unwrap();
    assert_eq!(all.total_commissions, 3);
    assert_eq!(all.total_transaction_value, Money::from_units(21_000));
}

#[tokio::test]
async fn transaction_statistics_split_by_status_and_period() {
    let h = harness(100);
    let completed = advance_to_shares_released(&h, 10).await;
    h.transactions
        .update_status(&broker(), &completed, TransactionStatus::Completed, None)
        .await
        .unwrap();
    let cancelled = h.transactions.create(&client(), buy_input(3)).await.unwrap().id;
    h.transactions
        .update_status(&client(), &cancelled, TransactionStatus::Cancelled, None)
        .await
        .unwrap();
    h.transactions.create(&client(), buy_input(2)).await.unwrap();

    let last_year = Timestamp::new(Utc::now() - ChronoDuration::days(400));
    h.store
        .insert_transaction(ShareTransaction::reconstitute(ReconstitutedTransactionParams {
            id: TransactionId::new("old-1"),
            transaction_type: TransactionType::Buy,
            user_id: UserId::new("c1"),
            broker_id: UserId::new("b1"),
            company_id: CompanyId::new(COMPANY),
            requested_shares: ShareCount::new(50),
            agreed_price_per_share: Money::from_units(100),
            market_price_at_transaction: None,
            status: TransactionStatus::Completed,
            notes: None,
            payment_proof_url: Some("https://files.example.com/old.png".to_string()),
            inventory_released: true,
            completed_at: Some(last_year),
            created_at: last_year,
            updated_at: last_year,
        }).unwrap())
        .await;

    let week = h
        .stats
        .transaction_stats(
            &broker(),
            StatsQuery {
                broker_id: None,
                period: StatsPeriod::Week,
            },
        )
        .await
        .unwrap();
    assert_eq!(week.total_transactions, 3);
    assert_eq!(week.completed_transactions, 1);
    assert_eq!(week.cancelled_transactions, 1);
    assert_eq!(week.pending_transactions, 1);
    assert_eq!(week.total_transaction_value, Money::from_units(1_000));

    let all = h
        .stats
        .transaction_stats(&admin(), StatsQuery::default())
        .await
        .unwrap();
    assert_eq!(all.total_transactions, 4);
    assert_eq!(all.total_transaction_value, Money::from_units(6_000));
}

// =============================================================================
// Invariants
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_release_inventory_once() {
    let h = harness(100);
    let a = h.new_commission(100).await;
    let b = h.new_commission(100).await;

    let first = {
        let engine = Arc::clone(&h.commissions);
        tokio::spawn(async move {
            engine
                .update_status(&broker(), &a, CommissionStatus::Completed, None)
                .await
        })
    };
    let second = {
        let engine = Arc::clone(&h.commissions);
        tokio::spawn(async move {
            engine
                .update_status(&broker(), &b, CommissionStatus::Completed, None)
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(SettlementError::InsufficientShares { .. })))
        .count();

    assert_eq!(succeeded, 1);
    assert_eq!(refused, 1);
    assert_eq!(h.available().await, ShareCount::ZERO);
}

#[tokio::test]
async fn repeated_completion_never_decrements_twice() {
    let h = harness(100);
    let id = h.new_commission(30).await;
    h.commissions
        .update_status(&broker(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap();

    let err = h
        .commissions
        .update_status(&broker(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SettlementError::InvalidTransition { .. }));
    assert_eq!(h.available().await, ShareCount::new(70));
}

#[tokio::test]
async fn completed_commission_is_immutable() {
    let h = harness(100);
    let id = h.new_commission(10).await;
    h.commissions
        .update_status(&broker(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap();

    let err = h
        .commissions
        .update(
            &broker(),
            &id,
            AmendCommissionCommand {
                notes: Some("late edit".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::ImmutableRecord { .. }));
    assert_eq!(err.to_string(), "Cannot modify completed commission");

    let err = h.commissions.delete(&broker(), &id).await.unwrap_err();
    assert!(matches!(err, SettlementError::ImmutableRecord { .. }));

    let err = h
        .commissions
        .update_status(&broker(), &id, CommissionStatus::Cancelled, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::InvalidTransition { .. }));
}

#[tokio::test]
async fn cancelled_transaction_is_immutable() {
    let h = harness(100);
    let id = h.transactions.create(&client(), buy_input(5)).await.unwrap().id;
    h.transactions
        .update_status(&client(), &id, TransactionStatus::Cancelled, None)
        .await
        .unwrap();

    let err = h.transactions.delete(&broker(), &id).await.unwrap_err();
    assert!(matches!(err, SettlementError::ImmutableRecord { .. }));

    let err = h
        .transactions
        .update(
            &broker(),
            &id,
            AmendTransactionCommand {
                requested_shares: Some(ShareCount::new(6)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::ImmutableRecord { .. }));

    let err = h
        .transactions
        .update_status(&broker(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::InvalidTransition { .. }));
}

#[tokio::test]
async fn rejected_commission_can_be_reopened_and_completed() {
    let h = harness(100);
    let id = h.new_commission(10).await;
    for status in [
        CommissionStatus::InProgress,
        CommissionStatus::Rejected,
        CommissionStatus::Pending,
        CommissionStatus::Completed,
    ] {
        h.commissions
            .update_status(&broker(), &id, status, None)
            .await
            .unwrap();
    }
    assert_eq!(h.available().await, ShareCount::new(90));
}

// =============================================================================
// Transactions
// =============================================================================

async fn advance_to_shares_released(h: &Harness, shares: u64) -> TransactionId {
    let id = h.transactions.create(&client(), buy_input(shares)).await.unwrap().id;
    h.transactions
        .update_status(&broker(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap();
    h.transactions
        .upload_payment_proof(&client(), &id, "https://files.example.com/p.png".to_string())
        .await
        .unwrap();
    h.transactions
        .update_status(&broker(), &id, TransactionStatus::SharesReleased, None)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn buy_flow_releases_inventory_and_stamps_completion() {
    let h = harness(100);
    let id = advance_to_shares_released(&h, 40).await;
    assert_eq!(h.available().await, ShareCount::new(60));

    let view = h
        .transactions
        .update_status(&broker(), &id, TransactionStatus::Completed, None)
        .await
        .unwrap();

    assert_eq!(view.status, TransactionStatus::Completed);
    assert!(view.completed_at.is_some());
    assert!(view.inventory_released);
    assert_eq!(h.available().await, ShareCount::new(60));
}

#[tokio::test]
async fn buy_release_beyond_inventory_leaves_transaction_unchanged() {
    let h = harness(5);
    let id = h.transactions.create(&client(), buy_input(10)).await.unwrap().id;
    h.transactions
        .update_status(&broker(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap();
    h.transactions
        .upload_payment_proof(&client(), &id, "https://files.example.com/p.png".to_string())
        .await
        .unwrap();

    let err = h
        .transactions
        .update_status(&broker(), &id, TransactionStatus::SharesReleased, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SettlementError::InsufficientShares { .. }));
    assert_eq!(h.available().await, ShareCount::new(5));
    let view = h.transactions.get(&broker(), &id).await.unwrap();
    assert_eq!(view.status, TransactionStatus::PaymentConfirmed);
    assert!(!view.inventory_released);
}

#[tokio::test]
async fn buy_cannot_skip_share_release() {
    let h = harness(100);
    let id = h.transactions.create(&client(), buy_input(10)).await.unwrap().id;
    h.transactions
        .update_status(&broker(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap();

    let err = h
        .transactions
        .update_status(&broker(), &id, TransactionStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::InvalidTransition { .. }));
}

#[tokio::test]
async fn sell_flow_goes_through_market_listing() {
    let h = harness(100);
    let mut input = buy_input(10);
    input.transaction_type = TransactionType::Sell;
    let id = h.transactions.create(&client(), input).await.unwrap().id;

    for status in [
        TransactionStatus::PendingMarketListing,
        TransactionStatus::ListedOnMarket,
        TransactionStatus::Completed,
    ] {
        h.transactions
            .update_status(&broker(), &id, status, None)
            .await
            .unwrap();
    }
    assert_eq!(h.available().await, ShareCount::new(100));
}

#[tokio::test]
async fn sell_completion_rechecks_inventory() {
    let h = harness(100);
    let mut input = buy_input(60);
    input.transaction_type = TransactionType::Sell;
    let id = h.transactions.create(&client(), input).await.unwrap().id;
    for status in [
        TransactionStatus::PendingMarketListing,
        TransactionStatus::ListedOnMarket,
    ] {
        h.transactions
            .update_status(&broker(), &id, status, None)
            .await
            .unwrap();
    }

    // inventory drained below the sell's size while it sat on the market
    let commission = h.new_commission(50).await;
    h.commissions
        .update_status(&broker(), &commission, CommissionStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(h.available().await, ShareCount::new(50));

    let err = h
        .transactions
        .update_status(&broker(), &id, TransactionStatus::Completed, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SettlementError::InsufficientShares { .. }));
    let view = h.transactions.get(&broker(), &id).await.unwrap();
    assert_eq!(view.status, TransactionStatus::ListedOnMarket);
    assert!(view.completed_at.is_none());
    assert_eq!(h.available().await, ShareCount::new(50));
}

#[tokio::test]
async fn released_transaction_cannot_be_deleted() {
    let h = harness(100);
    let id = advance_to_shares_released(&h, 25).await;

    let err = h.transactions.delete(&broker(), &id).await.unwrap_err();

    assert!(matches!(err, SettlementError::Validation { .. }));
    let view = h.transactions.get(&broker(), &id).await.unwrap();
    assert_eq!(view.status, TransactionStatus::SharesReleased);
    assert!(view.inventory_released);
    assert_eq!(h.available().await, ShareCount::new(75));
}

#[tokio::test]
async fn oversized_prices_are_rejected_as_validation() {
    let h = harness(100);

    let mut input = buy_input(2);
    input.agreed_price_per_share = Money::new(rust_decimal::Decimal::MAX);
    let err = h.transactions.create(&client(), input).await.unwrap_err();
    assert!(matches!(err, SettlementError::Validation { .. }));

    let mut input = commission_input(2);
    input.price_per_share = Money::new(rust_decimal::Decimal::MAX);
    let err = h.commissions.create(&broker(), input).await.unwrap_err();
    assert!(matches!(err, SettlementError::Validation { .. }));

    assert_eq!(h.available().await, ShareCount::new(100));
}

#[tokio::test]
async fn cancel_after_release_restores_inventory_when_enabled() {
    let h = harness_with(100, true);
    let id = advance_to_shares_released(&h, 25).await;
    assert_eq!(h.available().await, ShareCount::new(75));

    let view = h
        .transactions
        .update_status(&broker(), &id, TransactionStatus::Cancelled, None)
        .await
        .unwrap();

    assert_eq!(view.status, TransactionStatus::Cancelled);
    assert!(!view.inventory_released);
    assert_eq!(h.available().await, ShareCount::new(100));
}

#[tokio::test]
async fn cancel_after_release_keeps_inventory_by_default() {
    let h = harness(100);
    let id = advance_to_shares_released(&h, 25).await;

    h.transactions
        .update_status(&broker(), &id, TransactionStatus::Cancelled, None)
        .await
        .unwrap();

    assert_eq!(h.available().await, ShareCount::new(75));
}

#[tokio::test]
async fn amendment_only_while_awaiting_approval() {
    let h = harness(100);
    let id = h.transactions.create(&client(), buy_input(10)).await.unwrap().id;

    let view = h
        .transactions
        .update(
            &client(),
            &id,
            AmendTransactionCommand {
                requested_shares: Some(ShareCount::new(12)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(view.total_transaction_value, Money::from_units(1_200));

    h.transactions
        .update_status(&broker(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap();
    let err = h
        .transactions
        .update(
            &client(),
            &id,
            AmendTransactionCommand {
                notes: Some("more".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Validation { .. }));
}

// =============================================================================
// Access control
// =============================================================================

#[tokio::test]
async fn clients_cannot_settle_commissions() {
    let h = harness(100);
    let id = h.new_commission(10).await;

    let err = h
        .commissions
        .update_status(&client(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));
    assert_eq!(h.available().await, ShareCount::new(100));
}

#[tokio::test]
async fn brokers_only_touch_their_own_records() {
    let h = harness(100);
    let id = h.new_commission(10).await;

    let err = h
        .commissions
        .update_status(&other_broker(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));

    let err = h.commissions.get(&other_broker(), &id).await.unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));

    let err = h
        .commissions
        .create(
            &broker(),
            CreateCommissionInput {
                broker_id: Some(UserId::new("b2")),
                ..commission_input(1)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));
}

#[tokio::test]
async fn clients_may_only_cancel_their_own_transactions() {
    let h = harness(100);
    let id = h.transactions.create(&client(), buy_input(10)).await.unwrap().id;

    let err = h
        .transactions
        .update_status(&client(), &id, TransactionStatus::PendingPayment, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));

    let stranger = Actor::new("c2", Role::Client);
    let err = h
        .transactions
        .update_status(&stranger, &id, TransactionStatus::Cancelled, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));

    let err = h.transactions.delete(&client(), &id).await.unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));
}

#[tokio::test]
async fn party_roles_are_validated() {
    let h = harness(100);

    let err = h
        .commissions
        .create(
            &admin(),
            CreateCommissionInput {
                broker_id: Some(UserId::new("c2")),
                ..commission_input(1)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Validation { .. }));

    let err = h
        .commissions
        .create(
            &broker(),
            CreateCommissionInput {
                customer_id: Some(UserId::new("ghost")),
                ..commission_input(1)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::NotFound { .. }));

    let err = h
        .commissions
        .create(
            &broker(),
            CreateCommissionInput {
                company_id: CompanyId::new("missing"),
                ..commission_input(1)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::NotFound { .. }));
}

#[tokio::test]
async fn broker_rate_is_used_when_none_given() {
    let h = harness(100);
    let view = h
        .commissions
        .create(
            &broker(),
            CreateCommissionInput {
                commission_rate: None,
                ..commission_input(10)
            },
        )
        .await
        .unwrap();

    assert_eq!(view.commission_rate.percent(), dec!(1.5));
    assert_eq!(view.commission_amount, Money::new(dec!(15)));
}

#[tokio::test]
async fn broker_statistics_are_pinned_to_the_broker() {
    let h = harness(100);
    h.new_commission(10).await;
    h.commissions
        .create(&other_broker(), commission_input(10))
        .await
        .unwrap();

    let own = h
        .stats
        .commission_stats(
            &broker(),
            StatsQuery {
                broker_id: Some(UserId::new("b2")),
                period: StatsPeriod::All,
            },
        )
        .await
        .unwrap();
    assert_eq!(own.total_commissions, 1);

    let everyone = h
        .stats
        .commission_stats(&admin(), StatsQuery::default())
        .await
        .unwrap();
    assert_eq!(everyone.total_commissions, 2);

    let err = h
        .stats
        .commission_stats(&client(), StatsQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Forbidden(_)));
}

#[tokio::test]
async fn listings_respect_ownership_and_search() {
    let h = harness(100);
    h.new_commission(10).await;
    h.commissions
        .create(&other_broker(), commission_input(20))
        .await
        .unwrap();

    let mine = h
        .commissions
        .list_mine(&broker(), CommissionListQuery::default())
        .await
        .unwrap();
    assert_eq!(mine.total, 1);

    let customer_view = h
        .commissions
        .list_mine(&client(), CommissionListQuery::default())
        .await
        .unwrap();
    assert_eq!(customer_view.total, 2);

    let searched = h
        .commissions
        .list(
            &admin(),
            CommissionListQuery {
                search: Some("USER B2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(searched.total, 1);
    assert_eq!(searched.items[0].broker_id, UserId::new("b2"));
}

// =============================================================================
// Notifications
// =============================================================================

async fn wait_for_messages(notifier: &RecordingNotifier, at_least: usize) -> usize {
    for _ in 0..100 {
        let count = notifier.sent().await.len();
        if count >= at_least {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    notifier.sent().await.len()
}

#[tokio::test]
async fn creation_notifies_both_parties() {
    let h = harness(100);
    h.new_commission(10).await;

    assert_eq!(wait_for_messages(&h.notifier, 2).await, 2);
    let recipients: Vec<String> = h.notifier.sent().await.into_iter().map(|m| m.to).collect();
    assert!(recipients.contains(&"b1@example.com".to_string()));
    assert!(recipients.contains(&"c1@example.com".to_string()));
}

#[tokio::test]
async fn failed_notifications_do_not_fail_the_operation() {
    let h = harness(100);
    h.notifier.set_failing(true);

    let id = h.new_commission(10).await;
    let view = h
        .commissions
        .update_status(&broker(), &id, CommissionStatus::Completed, None)
        .await
        .unwrap();

    assert_eq!(view.status, CommissionStatus::Completed);
    assert_eq!(h.available().await, ShareCount::new(90));
}
