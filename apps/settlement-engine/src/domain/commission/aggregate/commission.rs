//! Commission Aggregate Root
//!
//! A broker's commission on a share purchase. Amounts are always derived:
//! `total_amount = shares * price` and
//! `commission_amount = total_amount * rate / 100`.

use crate::domain::commission::events::CommissionEvent;
use crate::domain::commission::services::CommissionStateMachine;
use crate::domain::commission::value_objects::CommissionStatus;
use crate::domain::shared::{
    CommissionId, CommissionRate, CompanyId, Money, ShareCount, Timestamp, UserId,
};
use crate::error::SettlementError;

/// Command to create a new commission.
#[derive(Debug, Clone)]
pub struct CreateCommissionCommand {
    /// Broker earning the commission.
    pub broker_id: UserId,
    /// Customer the shares are bought for.
    pub customer_id: UserId,
    /// Company whose shares are traded.
    pub company_id: CompanyId,
    /// Number of shares.
    pub number_of_shares: ShareCount,
    /// Price per share.
    pub price_per_share: Money,
    /// Resolved commission rate.
    pub commission_rate: CommissionRate,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who created the record.
    pub created_by: UserId,
}

/// Amendment to an open commission. `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct AmendCommissionCommand {
    /// New share count.
    pub number_of_shares: Option<ShareCount>,
    /// New price per share.
    pub price_per_share: Option<Money>,
    /// New rate.
    pub commission_rate: Option<CommissionRate>,
    /// New notes.
    pub notes: Option<String>,
}

impl AmendCommissionCommand {
    /// True when nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.number_of_shares.is_none()
            && self.price_per_share.is_none()
            && self.commission_rate.is_none()
            && self.notes.is_none()
    }
}

/// Parameters for reconstituting a commission from storage.
#[derive(Debug, Clone)]
pub struct ReconstitutedCommissionParams {
    /// Commission ID.
    pub id: CommissionId,
    /// Broker.
    pub broker_id: UserId,
    /// Customer.
    pub customer_id: UserId,
    /// Company.
    pub company_id: CompanyId,
    /// Share count.
    pub number_of_shares: ShareCount,
    /// Price per share.
    pub price_per_share: Money,
    /// Rate.
    pub commission_rate: CommissionRate,
    /// Current status.
    pub status: CommissionStatus,
    /// Notes.
    pub notes: Option<String>,
    /// Creator.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Commission Aggregate Root.
#[derive(Debug, Clone)]
pub struct Commission {
    id: CommissionId,
    broker_id: UserId,
    customer_id: UserId,
    company_id: CompanyId,
    number_of_shares: ShareCount,
    price_per_share: Money,
    total_amount: Money,
    commission_rate: CommissionRate,
    commission_amount: Money,
    status: CommissionStatus,
    notes: Option<String>,
    created_by: UserId,
    events: Vec<CommissionEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Commission {
    /// Create a new pending commission.
    ///
    /// Generates a `Created` event.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the share count or price is invalid.
    pub fn new(cmd: CreateCommissionCommand) -> Result<Self, SettlementError> {
        cmd.number_of_shares.validate_for_request("numberOfShares")?;
        cmd.price_per_share.validate_as_price("pricePerShare")?;

        let now = Timestamp::now();
        let total_amount = cmd
            .price_per_share
            .times_shares(cmd.number_of_shares, "pricePerShare")?;
        let commission_amount = total_amount.apply_rate(cmd.commission_rate)?;

        let mut commission = Self {
            id: CommissionId::generate(),
            broker_id: cmd.broker_id,
            customer_id: cmd.customer_id,
            company_id: cmd.company_id,
            number_of_shares: cmd.number_of_shares,
            price_per_share: cmd.price_per_share,
            total_amount,
            commission_rate: cmd.commission_rate,
            commission_amount,
            status: CommissionStatus::Pending,
            notes: cmd.notes,
            created_by: cmd.created_by,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        commission.events.push(CommissionEvent::Created {
            commission_id: commission.id.clone(),
            broker_id: commission.broker_id.clone(),
            customer_id: commission.customer_id.clone(),
            commission_amount,
            occurred_at: now,
        });

        Ok(commission)
    }

    /// Reconstitute a commission from stored state (no events generated).
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the stored amounts overflow.
    pub fn reconstitute(params: ReconstitutedCommissionParams) -> Result<Self, SettlementError> {
        let total_amount = params
            .price_per_share
            .times_shares(params.number_of_shares, "pricePerShare")?;
        let commission_amount = total_amount.apply_rate(params.commission_rate)?;
        Ok(Self {
            id: params.id,
            broker_id: params.broker_id,
            customer_id: params.customer_id,
            company_id: params.company_id,
            number_of_shares: params.number_of_shares,
            price_per_share: params.price_per_share,
            total_amount,
            commission_rate: params.commission_rate,
            commission_amount,
            status: params.status,
            notes: params.notes,
            created_by: params.created_by,
            events: Vec::new(),
            created_at: params.created_at,
            updated_at: params.updated_at,
        })
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Commission ID.
    #[must_use]
    pub const fn id(&self) -> &CommissionId {
        &self.id
    }

    /// Broker ID.
    #[must_use]
    pub const fn broker_id(&self) -> &UserId {
        &self.broker_id
    }

    /// Customer ID.
    #[must_use]
    pub const fn customer_id(&self) -> &UserId {
        &self.customer_id
    }

    /// Company ID.
    #[must_use]
    pub const fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Share count.
    #[must_use]
    pub const fn number_of_shares(&self) -> ShareCount {
        self.number_of_shares
    }

    /// Price per share.
    #[must_use]
    pub const fn price_per_share(&self) -> Money {
        self.price_per_share
    }

    /// Shares × price.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Commission rate.
    #[must_use]
    pub const fn commission_rate(&self) -> CommissionRate {
        self.commission_rate
    }

    /// Total × rate / 100.
    #[must_use]
    pub const fn commission_amount(&self) -> Money {
        self.commission_amount
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> CommissionStatus {
        self.status
    }

    /// Notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Creator.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Fail if the commission is completed or cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableRecord` for terminal commissions.
    pub fn ensure_mutable(&self) -> Result<(), SettlementError> {
        if self.status.is_terminal() {
            return Err(SettlementError::ImmutableRecord {
                entity: "commission",
                id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Move to `to`, optionally replacing the notes.
    ///
    /// Inventory is not touched here; the engine releases shares in the same
    /// unit of work before calling this for `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the state machine refuses.
    pub fn transition_to(
        &mut self,
        to: CommissionStatus,
        notes: Option<String>,
    ) -> Result<(), SettlementError> {
        CommissionStateMachine::validate_transition(self.status, to)?;

        let from = self.status;
        self.status = to;
        if notes.is_some() {
            self.notes = notes;
        }
        self.updated_at = Timestamp::now();

        self.events.push(CommissionEvent::StatusChanged {
            commission_id: self.id.clone(),
            broker_id: self.broker_id.clone(),
            customer_id: self.customer_id.clone(),
            from,
            to,
            occurred_at: self.updated_at,
        });
        Ok(())
    }

    /// Apply an amendment and recompute derived amounts.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableRecord` for terminal commissions, `Validation` for bad
    /// values.
    pub fn amend(&mut self, cmd: AmendCommissionCommand) -> Result<(), SettlementError> {
        self.ensure_mutable()?;

        if let Some(shares) = cmd.number_of_shares {
            shares.validate_for_request("numberOfShares")?;
        }
        if let Some(price) = cmd.price_per_share {
            price.validate_as_price("pricePerShare")?;
        }

        let number_of_shares = cmd.number_of_shares.unwrap_or(self.number_of_shares);
        let price_per_share = cmd.price_per_share.unwrap_or(self.price_per_share);
        let commission_rate = cmd.commission_rate.unwrap_or(self.commission_rate);
        let total_amount = price_per_share.times_shares(number_of_shares, "pricePerShare")?;
        let commission_amount = total_amount.apply_rate(commission_rate)?;

        self.number_of_shares = number_of_shares;
        self.price_per_share = price_per_share;
        self.commission_rate = commission_rate;
        self.total_amount = total_amount;
        self.commission_amount = commission_amount;
        if cmd.notes.is_some() {
            self.notes = cmd.notes;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Take pending domain events.
    pub fn drain_events(&mut self) -> Vec<CommissionEvent> {
        std::mem::take(&mut self.events)
    }
}
