//! HTTP request DTOs.
//!
//! Bodies and query strings are camelCase. Each request converts into the
//! application input it stands for, validating rates on the way.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::dto::{
    CommissionListQuery, CreateCommissionInput, CreateTransactionInput, PageRequest,
    PageSettings, StatsQuery, TransactionListQuery,
};
use crate::domain::commission::{AmendCommissionCommand, CommissionStatus};
use crate::domain::shared::{CommissionRate, CompanyId, Money, ShareCount, UserId};
use crate::domain::statistics::StatsPeriod;
use crate::domain::transaction::{AmendTransactionCommand, TransactionStatus, TransactionType};
use crate::error::SettlementError;

fn rate(value: Option<Decimal>) -> Result<Option<CommissionRate>, SettlementError> {
    value
        .map(CommissionRate::new)
        .transpose()
        .map_err(SettlementError::from)
}

/// Body of `POST /commissions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommissionRequest {
    /// Broker; defaults to the caller when the caller is a broker.
    #[serde(default)]
    pub broker_id: Option<UserId>,
    /// Customer; defaults to the caller when the caller is a client.
    #[serde(default)]
    pub customer_id: Option<UserId>,
    /// Company.
    pub company_id: CompanyId,
    /// Share count.
    pub number_of_shares: u64,
    /// Price per share.
    pub price_per_share: Decimal,
    /// Percentage; defaults to the broker's rate.
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<CreateCommissionRequest> for CreateCommissionInput {
    type Error = SettlementError;

    fn try_from(req: CreateCommissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            broker_id: req.broker_id,
            customer_id: req.customer_id,
            company_id: req.company_id,
            number_of_shares: ShareCount::new(req.number_of_shares),
            price_per_share: Money::new(req.price_per_share),
            commission_rate: rate(req.commission_rate)?,
            notes: req.notes,
        })
    }
}

/// Body of `PUT /commissions/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommissionRequest {
    /// New share count.
    #[serde(default)]
    pub number_of_shares: Option<u64>,
    /// New price per share.
    #[serde(default)]
    pub price_per_share: Option<Decimal>,
    /// New rate.
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<UpdateCommissionRequest> for AmendCommissionCommand {
    type Error = SettlementError;

    fn try_from(req: UpdateCommissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            number_of_shares: req.number_of_shares.map(ShareCount::new),
            price_per_share: req.price_per_share.map(Money::new),
            commission_rate: rate(req.commission_rate)?,
            notes: req.notes,
        })
    }
}

/// Body of `PATCH /commissions/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommissionStatusRequest {
    /// Target status.
    pub status: CommissionStatus,
    /// Notes replacing the current ones.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query of `GET /commissions` and `GET /commissions/my/commissions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionListParams {
    /// Free-text search.
    #[serde(default)]
    pub search: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<CommissionStatus>,
    /// Broker.
    #[serde(default)]
    pub broker_id: Option<UserId>,
    /// Customer.
    #[serde(default)]
    pub customer_id: Option<UserId>,
    /// Company.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// 1-based page.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl CommissionListParams {
    /// Convert using the engine's page limits.
    #[must_use]
    pub fn into_query(self, pages: PageSettings) -> CommissionListQuery {
        CommissionListQuery {
            search: self.search.filter(|s| !s.trim().is_empty()),
            status: self.status,
            broker_id: self.broker_id,
            customer_id: self.customer_id,
            company_id: self.company_id,
            page: PageRequest::resolve(self.page, self.limit, pages),
        }
    }
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Buy or sell.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Customer; required when an admin submits.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Broker.
    pub broker_id: UserId,
    /// Company.
    pub company_id: CompanyId,
    /// Requested shares.
    pub requested_shares: u64,
    /// Agreed price per share.
    pub agreed_price_per_share: Decimal,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateTransactionRequest> for CreateTransactionInput {
    fn from(req: CreateTransactionRequest) -> Self {
        Self {
            transaction_type: req.transaction_type,
            user_id: req.user_id,
            broker_id: req.broker_id,
            company_id: req.company_id,
            requested_shares: ShareCount::new(req.requested_shares),
            agreed_price_per_share: Money::new(req.agreed_price_per_share),
            notes: req.notes,
        }
    }
}

/// Body of `PUT /transactions/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    /// New share count.
    #[serde(default)]
    pub requested_shares: Option<u64>,
    /// New agreed price.
    #[serde(default)]
    pub agreed_price_per_share: Option<Decimal>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<UpdateTransactionRequest> for AmendTransactionCommand {
    fn from(req: UpdateTransactionRequest) -> Self {
        Self {
            requested_shares: req.requested_shares.map(ShareCount::new),
            agreed_price_per_share: req.agreed_price_per_share.map(Money::new),
            notes: req.notes,
        }
    }
}

/// Body of `PATCH /transactions/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionStatusRequest {
    /// Target status.
    pub status: TransactionStatus,
    /// Notes replacing the current ones.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /transactions/{id}/payment-proof`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProofRequest {
    /// Where the uploaded proof is stored.
    pub payment_proof_url: String,
}

/// Query of `GET /transactions` and `GET /transactions/my/transactions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    /// Status.
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    /// Buy or sell.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Customer.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Broker.
    #[serde(default)]
    pub broker_id: Option<UserId>,
    /// Company.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// 1-based page.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TransactionListParams {
    /// Convert using the engine's page limits.
    #[must_use]
    pub fn into_query(self, pages: PageSettings) -> TransactionListQuery {
        TransactionListQuery {
            status: self.status,
            transaction_type: self.transaction_type,
            user_id: self.user_id,
            broker_id: self.broker_id,
            company_id: self.company_id,
            page: PageRequest::resolve(self.page, self.limit, pages),
        }
    }
}

/// Query of the statistics endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    /// Broker to report on (admins only).
    #[serde(default)]
    pub broker_id: Option<UserId>,
    /// `today`, `week`, `month`, `year` or `all`.
    #[serde(default)]
    pub period: Option<String>,
}

impl TryFrom<StatsParams> for StatsQuery {
    type Error = SettlementError;

    fn try_from(params: StatsParams) -> Result<Self, Self::Error> {
        let period = params
            .period
            .as_deref()
            .map(str::parse::<StatsPeriod>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            broker_id: params.broker_id,
            period,
        })
    }
}
