//! Commission DTOs

use serde::{Deserialize, Serialize};

use super::{CompanySummary, PageRequest, PartySummary};
use crate::domain::commission::{Commission, CommissionStatus};
use crate::domain::shared::{
    CommissionId, CommissionRate, CompanyId, Money, ShareCount, Timestamp, UserId,
};

/// Input for creating a commission.
///
/// A broker actor may omit `broker_id` and a client actor may omit
/// `customer_id`; both default to the actor.
#[derive(Debug, Clone)]
pub struct CreateCommissionInput {
    /// Broker.
    pub broker_id: Option<UserId>,
    /// Customer.
    pub customer_id: Option<UserId>,
    /// Company.
    pub company_id: CompanyId,
    /// Share count.
    pub number_of_shares: ShareCount,
    /// Price per share.
    pub price_per_share: Money,
    /// Explicit rate; defaults to the broker's rate.
    pub commission_rate: Option<CommissionRate>,
    /// Notes.
    pub notes: Option<String>,
}

/// Commission list criteria.
#[derive(Debug, Clone, Default)]
pub struct CommissionListQuery {
    /// Free-text search over broker, customer and company names.
    pub search: Option<String>,
    /// Status.
    pub status: Option<CommissionStatus>,
    /// Broker.
    pub broker_id: Option<UserId>,
    /// Customer.
    pub customer_id: Option<UserId>,
    /// Company.
    pub company_id: Option<CompanyId>,
    /// Page.
    pub page: PageRequest,
}

/// Commission read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionView {
    /// ID.
    pub id: CommissionId,
    /// Broker ID.
    pub broker_id: UserId,
    /// Customer ID.
    pub customer_id: UserId,
    /// Company ID.
    pub company_id: CompanyId,
    /// Share count.
    pub number_of_shares: ShareCount,
    /// Price per share.
    pub price_per_share: Money,
    /// Shares × price.
    pub total_amount: Money,
    /// Rate in percent.
    pub commission_rate: CommissionRate,
    /// Commission amount.
    pub commission_amount: Money,
    /// Status.
    pub status: CommissionStatus,
    /// Notes.
    pub notes: Option<String>,
    /// Creator.
    pub created_by: UserId,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
    /// Broker summary.
    pub broker: Option<PartySummary>,
    /// Customer summary.
    pub customer: Option<PartySummary>,
    /// Company summary.
    pub company: Option<CompanySummary>,
}

impl CommissionView {
    /// Build the read model from the aggregate and its resolved parties.
    #[must_use]
    pub fn assemble(
        commission: &Commission,
        broker: Option<PartySummary>,
        customer: Option<PartySummary>,
        company: Option<CompanySummary>,
    ) -> Self {
        Self {
            id: commission.id().clone(),
            broker_id: commission.broker_id().clone(),
            customer_id: commission.customer_id().clone(),
            company_id: commission.company_id().clone(),
            number_of_shares: commission.number_of_shares(),
            price_per_share: commission.price_per_share(),
            total_amount: commission.total_amount(),
            commission_rate: commission.commission_rate(),
            commission_amount: commission.commission_amount(),
            status: commission.status(),
            notes: commission.notes().map(str::to_string),
            created_by: commission.created_by().clone(),
            created_at: commission.created_at(),
            updated_at: commission.updated_at(),
            broker,
            customer,
            company,
        }
    }

    /// Case-insensitive search over broker and customer name or email and
    /// company name.
    #[must_use]
    pub fn matches_search(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.broker.as_ref().is_some_and(|p| p.matches(&needle))
            || self.customer.as_ref().is_some_and(|p| p.matches(&needle))
            || self
                .company
                .as_ref()
                .is_some_and(|c| c.name.to_lowercase().contains(&needle))
    }
}
