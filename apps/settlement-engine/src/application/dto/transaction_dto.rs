//! Transaction DTOs

use serde::{Deserialize, Serialize};

use super::{CompanySummary, PageRequest, PartySummary};
use crate::domain::shared::{CompanyId, Money, ShareCount, Timestamp, TransactionId, UserId};
use crate::domain::transaction::{ShareTransaction, TransactionStatus, TransactionType};

/// Input for creating a transaction. A client actor may omit `user_id`.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Buy or sell.
    pub transaction_type: TransactionType,
    /// Customer.
    pub user_id: Option<UserId>,
    /// Broker.
    pub broker_id: UserId,
    /// Company.
    pub company_id: CompanyId,
    /// Requested shares.
    pub requested_shares: ShareCount,
    /// Agreed price per share.
    pub agreed_price_per_share: Money,
    /// Notes.
    pub notes: Option<String>,
}

/// Transaction list criteria.
#[derive(Debug, Clone, Default)]
pub struct TransactionListQuery {
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
    /// Page.
    pub page: PageRequest,
}

/// Transaction read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    /// ID.
    pub id: TransactionId,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Customer ID.
    pub user_id: UserId,
    /// Broker ID.
    pub broker_id: UserId,
    /// Company ID.
    pub company_id: CompanyId,
    /// Requested shares.
    pub requested_shares: ShareCount,
    /// Agreed price.
    pub agreed_price_per_share: Money,
    /// Closing price snapshot at creation.
    pub market_price_at_transaction: Option<Money>,
    /// Shares × agreed price.
    pub total_transaction_value: Money,
    /// Status.
    pub status: TransactionStatus,
    /// Notes.
    pub notes: Option<String>,
    /// Payment proof location.
    pub payment_proof_url: Option<String>,
    /// Inventory decremented for this transaction.
    pub inventory_released: bool,
    /// Completed at.
    pub completed_at: Option<Timestamp>,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
    /// Customer summary.
    pub user: Option<PartySummary>,
    /// Broker summary.
    pub broker: Option<PartySummary>,
    /// Company summary.
    pub company: Option<CompanySummary>,
}

impl TransactionView {
    /// Build the read model from the aggregate and its resolved parties.
    #[must_use]
    pub fn assemble(
        transaction: &ShareTransaction,
        user: Option<PartySummary>,
        broker: Option<PartySummary>,
        company: Option<CompanySummary>,
    ) -> Self {
        Self {
            id: transaction.id().clone(),
            transaction_type: transaction.transaction_type(),
            user_id: transaction.user_id().clone(),
            broker_id: transaction.broker_id().clone(),
            company_id: transaction.company_id().clone(),
            requested_shares: transaction.requested_shares(),
            agreed_price_per_share: transaction.agreed_price_per_share(),
            market_price_at_transaction: transaction.market_price_at_transaction(),
            total_transaction_value: transaction.total_transaction_value(),
            status: transaction.status(),
            notes: transaction.notes().map(str::to_string),
            payment_proof_url: transaction.payment_proof_url().map(str::to_string),
            inventory_released: transaction.inventory_released(),
            completed_at: transaction.completed_at(),
            created_at: transaction.created_at(),
            updated_at: transaction.updated_at(),
            user,
            broker,
            company,
        }
    }
}
