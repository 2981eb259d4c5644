//! Settlement Store Port (Driven Port)
//!
//! Persistence for companies, commissions and transactions.
//!
//! Every write goes through a [`UnitOfWork`]. A unit of work sees its own
//! staged writes, and nothing it stages becomes visible until
//! [`UnitOfWork::commit`]. Dropping a unit without committing discards it.
//! Units are serialized: while one is open, no other unit can begin, so a
//! read-check-write sequence inside a unit cannot race another writer.

use async_trait::async_trait;

use crate::domain::commission::{Commission, CommissionStatus};
use crate::domain::inventory::Company;
use crate::domain::shared::{CommissionId, CompanyId, Timestamp, TransactionId, UserId};
use crate::domain::transaction::{ShareTransaction, TransactionStatus, TransactionType};
use crate::error::SettlementError;

/// Persistence failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Backend unavailable.
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    /// Commit could not be applied.
    #[error("Commit failed: {message}")]
    CommitFailed { message: String },
}

impl From<StoreError> for SettlementError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

/// Commission query criteria. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CommissionFilter {
    /// Status.
    pub status: Option<CommissionStatus>,
    /// Broker.
    pub broker_id: Option<UserId>,
    /// Customer.
    pub customer_id: Option<UserId>,
    /// Company.
    pub company_id: Option<CompanyId>,
    /// Either broker or customer.
    pub party: Option<UserId>,
    /// Created at or after.
    pub created_from: Option<Timestamp>,
}

impl CommissionFilter {
    /// Whether `commission` satisfies the filter.
    #[must_use]
    pub fn matches(&self, commission: &Commission) -> bool {
        self.status.is_none_or(|s| commission.status() == s)
            && self
                .broker_id
                .as_ref()
                .is_none_or(|id| commission.broker_id() == id)
            && self
                .customer_id
                .as_ref()
                .is_none_or(|id| commission.customer_id() == id)
            && self
                .company_id
                .as_ref()
                .is_none_or(|id| commission.company_id() == id)
            && self.party.as_ref().is_none_or(|id| {
                commission.broker_id() == id || commission.customer_id() == id
            })
            && self
                .created_from
                .is_none_or(|from| commission.created_at() >= from)
    }
}

/// Transaction query criteria. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Status.
    pub status: Option<TransactionStatus>,
    /// Buy or sell.
    pub transaction_type: Option<TransactionType>,
    /// Customer.
    pub user_id: Option<UserId>,
    /// Broker.
    pub broker_id: Option<UserId>,
    /// Company.
    pub company_id: Option<CompanyId>,
    /// Either broker or customer.
    pub party: Option<UserId>,
    /// Created at or after.
    pub created_from: Option<Timestamp>,
}

impl TransactionFilter {
    /// Whether `transaction` satisfies the filter.
    #[must_use]
    pub fn matches(&self, transaction: &ShareTransaction) -> bool {
        self.status.is_none_or(|s| transaction.status() == s)
            && self
                .transaction_type
                .is_none_or(|t| transaction.transaction_type() == t)
            && self
                .user_id
                .as_ref()
                .is_none_or(|id| transaction.user_id() == id)
            && self
                .broker_id
                .as_ref()
                .is_none_or(|id| transaction.broker_id() == id)
            && self
                .company_id
                .as_ref()
                .is_none_or(|id| transaction.company_id() == id)
            && self.party.as_ref().is_none_or(|id| {
                transaction.broker_id() == id || transaction.user_id() == id
            })
            && self
                .created_from
                .is_none_or(|from| transaction.created_at() >= from)
    }
}

/// An open, serialized write session.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Load a company, including staged changes.
    async fn company(&mut self, id: &CompanyId) -> Result<Option<Company>, StoreError>;

    /// Stage a company write.
    async fn save_company(&mut self, company: &Company) -> Result<(), StoreError>;

    /// Load a commission, including staged changes.
    async fn commission(&mut self, id: &CommissionId) -> Result<Option<Commission>, StoreError>;

    /// Stage a commission write.
    async fn save_commission(&mut self, commission: &Commission) -> Result<(), StoreError>;

    /// Stage a commission deletion.
    async fn delete_commission(&mut self, id: &CommissionId) -> Result<(), StoreError>;

    /// Load a transaction, including staged changes.
    async fn transaction(
        &mut self,
        id: &TransactionId,
    ) -> Result<Option<ShareTransaction>, StoreError>;

    /// Stage a transaction write.
    async fn save_transaction(&mut self, transaction: &ShareTransaction)
    -> Result<(), StoreError>;

    /// Stage a transaction deletion.
    async fn delete_transaction(&mut self, id: &TransactionId) -> Result<(), StoreError>;

    /// Apply every staged write atomically.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Port for settlement persistence.
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Open a unit of work, waiting for any open unit to finish.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Read a committed company.
    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, StoreError>;

    /// Read a committed commission.
    async fn find_commission(&self, id: &CommissionId) -> Result<Option<Commission>, StoreError>;

    /// Committed commissions matching `filter`, newest first.
    async fn find_commissions(
        &self,
        filter: &CommissionFilter,
    ) -> Result<Vec<Commission>, StoreError>;

    /// Read a committed transaction.
    async fn find_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<ShareTransaction>, StoreError>;

    /// Committed transactions matching `filter`, newest first.
    async fn find_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<ShareTransaction>, StoreError>;
}
