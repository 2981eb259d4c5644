//! Transaction Engine
//!
//! Owns the buy/sell request lifecycle. Entering `shares_released` on a buy
//! decrements company inventory in the same unit of work as the status write.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use super::commission_engine::Lookups;
use super::observe;
use crate::application::dto::{
    CompanySummary, CreateTransactionInput, Page, PageSettings, PartySummary,
    TransactionListQuery, TransactionView,
};
use crate::application::ports::{
    MarketDataPort, NotificationPort, SettlementStore, TransactionFilter, UserDirectoryPort,
};
use crate::application::services::{Directory, InventoryService, NotificationDispatcher};
use crate::domain::access::{Action, Actor, Role};
use crate::domain::shared::{Money, TransactionId, UserId};
use crate::domain::transaction::{
    AmendTransactionCommand, CreateTransactionCommand, ShareTransaction, TransactionStateMachine,
    TransactionStatus,
};
use crate::error::SettlementError;
use crate::observability::{record_status_transition, update_available_shares};

/// Transaction engine settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionSettings {
    /// Give released shares back when a buy is cancelled after release.
    pub restore_inventory_on_cancel: bool,
    /// Page size limits for listings.
    pub pages: PageSettings,
}

/// Share transaction use cases.
pub struct TransactionEngine<S, U, N, M>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    store: Arc<S>,
    directory: Directory<U>,
    notifications: NotificationDispatcher<U, N>,
    market: Arc<M>,
    settings: TransactionSettings,
}

impl<S, U, N, M> TransactionEngine<S, U, N, M>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
    M: MarketDataPort,
{
    /// Create a new `TransactionEngine`.
    pub fn new(
        store: Arc<S>,
        users: Arc<U>,
        notifier: Arc<N>,
        market: Arc<M>,
        settings: TransactionSettings,
    ) -> Self {
        Self {
            store,
            directory: Directory::new(Arc::clone(&users)),
            notifications: NotificationDispatcher::new(users, notifier),
            market,
            settings,
        }
    }

    /// Page size limits.
    pub const fn page_settings(&self) -> PageSettings {
        self.settings.pages
    }

    /// Submit a buy or sell request.
    ///
    /// Starts in `pending_broker_approval` with the company's latest closing
    /// price captured when market data has one.
    #[instrument(skip_all, fields(actor = %actor.user_id, company_id = %input.company_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateTransactionInput,
    ) -> Result<TransactionView, SettlementError> {
        let started = Instant::now();
        let result = self.create_inner(actor, input).await;
        observe("transaction.create", started, &result);
        result
    }

    async fn create_inner(
        &self,
        actor: &Actor,
        input: CreateTransactionInput,
    ) -> Result<TransactionView, SettlementError> {
        actor.authorize(Action::CreateTransaction)?;

        let user_id = match (actor.role, input.user_id) {
            (Role::Client, None) => actor.user_id.clone(),
            (Role::Client, Some(id)) if id == actor.user_id => id,
            (Role::Client, Some(_)) => {
                return Err(SettlementError::Forbidden(
                    "clients may only submit transactions for themselves".to_string(),
                ));
            }
            (_, Some(id)) => id,
            (_, None) => return Err(SettlementError::validation("userId", "is required")),
        };

        let customer = self.directory.require_customer(&user_id, "userId").await?;
        let broker = self.directory.require_broker(&input.broker_id).await?;
        let company = self
            .store
            .find_company(&input.company_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("company", &input.company_id))?;

        let market_price = self.snapshot_price(company.symbol()).await;

        let mut transaction = ShareTransaction::new(CreateTransactionCommand {
            transaction_type: input.transaction_type,
            user_id,
            broker_id: input.broker_id,
            company_id: input.company_id,
            requested_shares: input.requested_shares,
            agreed_price_per_share: input.agreed_price_per_share,
            market_price_at_transaction: market_price,
            notes: input.notes,
        })?;

        let mut uow = self.store.begin().await?;
        let events = transaction.drain_events();
        uow.save_transaction(&transaction).await?;
        uow.commit().await?;

        info!(
            transaction_id = %transaction.id(),
            transaction_type = %transaction.transaction_type(),
            total = %transaction.total_transaction_value(),
            "Transaction created"
        );

        self.notifications.transaction_events(&events);

        Ok(TransactionView::assemble(
            &transaction,
            Some(PartySummary::from(&customer)),
            Some(PartySummary::from(&broker)),
            Some(CompanySummary::from(&company)),
        ))
    }

    /// Move a transaction to `status`.
    ///
    /// Clients may only cancel their own transactions. Entering
    /// `shares_released` releases inventory; a failed release leaves the
    /// transaction untouched.
    #[instrument(skip_all, fields(actor = %actor.user_id, transaction_id = %id, to = %status))]
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &TransactionId,
        status: TransactionStatus,
        notes: Option<String>,
    ) -> Result<TransactionView, SettlementError> {
        let started = Instant::now();
        let result = self.update_status_inner(actor, id, status, notes).await;
        observe("transaction.update_status", started, &result);
        result
    }

    async fn update_status_inner(
        &self,
        actor: &Actor,
        id: &TransactionId,
        status: TransactionStatus,
        notes: Option<String>,
    ) -> Result<TransactionView, SettlementError> {
        actor.authorize(Action::UpdateTransactionStatus)?;

        let mut uow = self.store.begin().await?;
        let mut transaction = uow
            .transaction(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("transaction", id))?;

        if actor.role == Role::Client {
            if &actor.user_id != transaction.user_id() {
                return Err(SettlementError::Forbidden(
                    "transaction belongs to another user".to_string(),
                ));
            }
            if status != TransactionStatus::Cancelled {
                return Err(SettlementError::Forbidden(
                    "clients may only cancel their transactions".to_string(),
                ));
            }
        } else {
            actor.ensure_broker_of(transaction.broker_id())?;
        }

        let from = transaction.status();
        TransactionStateMachine::validate_transition(transaction.transaction_type(), from, status)?;

        let mut inventory = None;
        if transaction.requires_inventory_release(status) {
            inventory = Some(
                InventoryService::release(
                    &mut *uow,
                    transaction.company_id(),
                    transaction.requested_shares(),
                )
                .await?,
            );
            transaction.mark_inventory_released();
        } else if transaction.requires_inventory_check(status) {
            InventoryService::check_within(
                &mut *uow,
                transaction.company_id(),
                transaction.requested_shares(),
            )
            .await?;
        } else if status == TransactionStatus::Cancelled
            && self.settings.restore_inventory_on_cancel
        {
            if let Some(shares) = transaction.take_released_shares() {
                inventory = Some(
                    InventoryService::restore(&mut *uow, transaction.company_id(), shares).await?,
                );
            }
        }

        transaction.transition_to(status, notes)?;
        let events = transaction.drain_events();
        uow.save_transaction(&transaction).await?;
        uow.commit().await?;

        record_status_transition("transaction", from.as_str(), status.as_str());
        if let Some(company) = &inventory {
            update_available_shares(company.id().as_str(), company.number_of_shares().value());
        }
        info!(
            transaction_id = %id,
            from = %from,
            to = %status,
            inventory_released = transaction.inventory_released(),
            "Transaction status changed"
        );

        self.notifications.transaction_events(&events);
        self.view(&transaction).await
    }

    /// Attach a payment proof to a transaction awaiting payment.
    #[instrument(skip_all, fields(actor = %actor.user_id, transaction_id = %id))]
    pub async fn upload_payment_proof(
        &self,
        actor: &Actor,
        id: &TransactionId,
        proof_url: String,
    ) -> Result<TransactionView, SettlementError> {
        actor.authorize(Action::UploadPaymentProof)?;

        let mut uow = self.store.begin().await?;
        let mut transaction = uow
            .transaction(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("transaction", id))?;
        ensure_customer_of(actor, &transaction)?;

        let from = transaction.status();
        transaction.record_payment_proof(proof_url)?;
        let events = transaction.drain_events();
        uow.save_transaction(&transaction).await?;
        uow.commit().await?;

        record_status_transition("transaction", from.as_str(), transaction.status().as_str());
        info!(transaction_id = %id, "Payment proof uploaded");

        self.notifications.transaction_events(&events);
        self.view(&transaction).await
    }

    /// Amend a transaction still awaiting broker approval.
    #[instrument(skip_all, fields(actor = %actor.user_id, transaction_id = %id))]
    pub async fn update(
        &self,
        actor: &Actor,
        id: &TransactionId,
        amendment: AmendTransactionCommand,
    ) -> Result<TransactionView, SettlementError> {
        actor.authorize(Action::UpdateTransaction)?;

        let mut uow = self.store.begin().await?;
        let mut transaction = uow
            .transaction(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("transaction", id))?;
        if actor.role == Role::Client {
            ensure_customer_of(actor, &transaction)?;
        } else {
            actor.ensure_broker_of(transaction.broker_id())?;
        }

        transaction.amend(amendment)?;
        uow.save_transaction(&transaction).await?;
        uow.commit().await?;
        info!(transaction_id = %id, "Transaction updated");

        self.view(&transaction).await
    }

    /// Delete a transaction that is not completed or cancelled and has not
    /// released inventory.
    #[instrument(skip_all, fields(actor = %actor.user_id, transaction_id = %id))]
    pub async fn delete(&self, actor: &Actor, id: &TransactionId) -> Result<(), SettlementError> {
        actor.authorize(Action::DeleteTransaction)?;

        let mut uow = self.store.begin().await?;
        let transaction = uow
            .transaction(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("transaction", id))?;
        actor.ensure_broker_of(transaction.broker_id())?;
        transaction.ensure_mutable()?;
        if transaction.inventory_released() {
            return Err(SettlementError::validation(
                "status",
                "shares have already been released; cancel the transaction instead",
            ));
        }

        uow.delete_transaction(id).await?;
        uow.commit().await?;
        info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }

    /// Read one transaction. Non-admins must be a party to it.
    pub async fn get(
        &self,
        actor: &Actor,
        id: &TransactionId,
    ) -> Result<TransactionView, SettlementError> {
        actor.authorize(Action::ViewOwnTransactions)?;
        let transaction = self
            .store
            .find_transaction(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("transaction", id))?;
        actor.ensure_party(transaction.broker_id(), transaction.user_id())?;
        self.view(&transaction).await
    }

    /// List all transactions matching `query`, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        query: TransactionListQuery,
    ) -> Result<Page<TransactionView>, SettlementError> {
        actor.authorize(Action::ViewAllTransactions)?;
        self.list_by_filters(query, None).await
    }

    /// List the actor's own transactions, as customer or broker.
    pub async fn list_mine(
        &self,
        actor: &Actor,
        query: TransactionListQuery,
    ) -> Result<Page<TransactionView>, SettlementError> {
        actor.authorize(Action::ViewOwnTransactions)?;
        self.list_by_filters(query, Some(actor.user_id.clone())).await
    }

    async fn list_by_filters(
        &self,
        query: TransactionListQuery,
        party: Option<UserId>,
    ) -> Result<Page<TransactionView>, SettlementError> {
        let filter = TransactionFilter {
            status: query.status,
            transaction_type: query.transaction_type,
            user_id: query.user_id,
            broker_id: query.broker_id,
            company_id: query.company_id,
            party,
            created_from: None,
        };
        let mut transactions = self.store.find_transactions(&filter).await?;
        transactions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let page = Page::paginate(transactions, query.page);
        let mut lookups = Lookups::default();
        let mut items = Vec::with_capacity(page.items.len());
        for transaction in &page.items {
            items.push(TransactionView::assemble(
                transaction,
                lookups.user(&self.directory, transaction.user_id()).await?,
                lookups.user(&self.directory, transaction.broker_id()).await?,
                lookups
                    .company(self.store.as_ref(), transaction.company_id())
                    .await?,
            ));
        }

        Ok(Page {
            items,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        })
    }

    async fn snapshot_price(&self, symbol: &str) -> Option<Money> {
        match self.market.latest_closing_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(symbol, error = %e, "Market price unavailable, skipping snapshot");
                None
            }
        }
    }

    async fn view(&self, transaction: &ShareTransaction) -> Result<TransactionView, SettlementError> {
        let company = self
            .store
            .find_company(transaction.company_id())
            .await?
            .as_ref()
            .map(CompanySummary::from);
        Ok(TransactionView::assemble(
            transaction,
            self.directory.summary(transaction.user_id()).await?,
            self.directory.summary(transaction.broker_id()).await?,
            company,
        ))
    }
}

fn ensure_customer_of(actor: &Actor, transaction: &ShareTransaction) -> Result<(), SettlementError> {
    if actor.is_admin() || &actor.user_id == transaction.user_id() {
        Ok(())
    } else {
        Err(SettlementError::Forbidden(
            "transaction belongs to another user".to_string(),
        ))
    }
}
