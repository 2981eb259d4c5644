//! Share Transaction Aggregate Root
//!
//! A customer's buy or sell request handled by a broker.

use crate::domain::shared::{CompanyId, Money, ShareCount, Timestamp, TransactionId, UserId};
use crate::domain::transaction::events::TransactionEvent;
use crate::domain::transaction::services::TransactionStateMachine;
use crate::domain::transaction::value_objects::{TransactionStatus, TransactionType};
use crate::error::SettlementError;

/// Command to create a new transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    /// Buy or sell.
    pub transaction_type: TransactionType,
    /// Customer.
    pub user_id: UserId,
    /// Broker handling the request.
    pub broker_id: UserId,
    /// Company whose shares are traded.
    pub company_id: CompanyId,
    /// Requested share count.
    pub requested_shares: ShareCount,
    /// Agreed price per share.
    pub agreed_price_per_share: Money,
    /// Latest closing price for the company's symbol, if known.
    pub market_price_at_transaction: Option<Money>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Amendment to a transaction still awaiting broker approval.
#[derive(Debug, Clone, Default)]
pub struct AmendTransactionCommand {
    /// New share count.
    pub requested_shares: Option<ShareCount>,
    /// New agreed price.
    pub agreed_price_per_share: Option<Money>,
    /// New notes.
    pub notes: Option<String>,
}

/// Parameters for reconstituting a transaction from storage.
#[derive(Debug, Clone)]
pub struct ReconstitutedTransactionParams {
    /// Transaction ID.
    pub id: TransactionId,
    /// Buy or sell.
    pub transaction_type: TransactionType,
    /// Customer.
    pub user_id: UserId,
    /// Broker.
    pub broker_id: UserId,
    /// Company.
    pub company_id: CompanyId,
    /// Requested shares.
    pub requested_shares: ShareCount,
    /// Agreed price.
    pub agreed_price_per_share: Money,
    /// Market price snapshot.
    pub market_price_at_transaction: Option<Money>,
    /// Status.
    pub status: TransactionStatus,
    /// Notes.
    pub notes: Option<String>,
    /// Payment proof location.
    pub payment_proof_url: Option<String>,
    /// Whether inventory has been decremented for this transaction.
    pub inventory_released: bool,
    /// Completion timestamp.
    pub completed_at: Option<Timestamp>,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Share Transaction Aggregate Root.
#[derive(Debug, Clone)]
pub struct ShareTransaction {
    id: TransactionId,
    transaction_type: TransactionType,
    user_id: UserId,
    broker_id: UserId,
    company_id: CompanyId,
    requested_shares: ShareCount,
    agreed_price_per_share: Money,
    market_price_at_transaction: Option<Money>,
    total_transaction_value: Money,
    status: TransactionStatus,
    notes: Option<String>,
    payment_proof_url: Option<String>,
    inventory_released: bool,
    events: Vec<TransactionEvent>,
    completed_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ShareTransaction {
    /// Create a new transaction awaiting broker approval.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the share count or price is invalid.
    pub fn new(cmd: CreateTransactionCommand) -> Result<Self, SettlementError> {
        cmd.requested_shares.validate_for_request("requestedShares")?;
        cmd.agreed_price_per_share
            .validate_as_price("agreedPricePerShare")?;

        let now = Timestamp::now();
        let total_transaction_value = cmd
            .agreed_price_per_share
            .times_shares(cmd.requested_shares, "agreedPricePerShare")?;

        let mut transaction = Self {
            id: TransactionId::generate(),
            transaction_type: cmd.transaction_type,
            user_id: cmd.user_id,
            broker_id: cmd.broker_id,
            company_id: cmd.company_id,
            requested_shares: cmd.requested_shares,
            agreed_price_per_share: cmd.agreed_price_per_share,
            market_price_at_transaction: cmd.market_price_at_transaction,
            total_transaction_value,
            status: TransactionStatus::PendingBrokerApproval,
            notes: cmd.notes,
            payment_proof_url: None,
            inventory_released: false,
            events: Vec::new(),
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        transaction.events.push(TransactionEvent::Created {
            transaction_id: transaction.id.clone(),
            transaction_type: transaction.transaction_type,
            user_id: transaction.user_id.clone(),
            broker_id: transaction.broker_id.clone(),
            total_transaction_value,
            occurred_at: now,
        });

        Ok(transaction)
    }

    /// Reconstitute a transaction from stored state (no events generated).
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the stored value overflows.
    pub fn reconstitute(params: ReconstitutedTransactionParams) -> Result<Self, SettlementError> {
        Ok(Self {
            total_transaction_value: params
                .agreed_price_per_share
                .times_shares(params.requested_shares, "agreedPricePerShare")?,
            id: params.id,
            transaction_type: params.transaction_type,
            user_id: params.user_id,
            broker_id: params.broker_id,
            company_id: params.company_id,
            requested_shares: params.requested_shares,
            agreed_price_per_share: params.agreed_price_per_share,
            market_price_at_transaction: params.market_price_at_transaction,
            status: params.status,
            notes: params.notes,
            payment_proof_url: params.payment_proof_url,
            inventory_released: params.inventory_released,
            events: Vec::new(),
            completed_at: params.completed_at,
            created_at: params.created_at,
            updated_at: params.updated_at,
        })
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Transaction ID.
    #[must_use]
    pub const fn id(&self) -> &TransactionId {
        &self.id
    }

    /// Buy or sell.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Customer.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Broker.
    #[must_use]
    pub const fn broker_id(&self) -> &UserId {
        &self.broker_id
    }

    /// Company.
    #[must_use]
    pub const fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Requested share count.
    #[must_use]
    pub const fn requested_shares(&self) -> ShareCount {
        self.requested_shares
    }

    /// Agreed price per share.
    #[must_use]
    pub const fn agreed_price_per_share(&self) -> Money {
        self.agreed_price_per_share
    }

    /// Closing price snapshot taken at creation.
    #[must_use]
    pub const fn market_price_at_transaction(&self) -> Option<Money> {
        self.market_price_at_transaction
    }

    /// Shares × agreed price.
    #[must_use]
    pub const fn total_transaction_value(&self) -> Money {
        self.total_transaction_value
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Payment proof location.
    #[must_use]
    pub fn payment_proof_url(&self) -> Option<&str> {
        self.payment_proof_url.as_deref()
    }

    /// Whether company inventory has been decremented for this transaction.
    #[must_use]
    pub const fn inventory_released(&self) -> bool {
        self.inventory_released
    }

    /// Completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
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

    /// Fail if the transaction is completed or cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableRecord` for completed or cancelled transactions.
    pub fn ensure_mutable(&self) -> Result<(), SettlementError> {
        if self.status.is_immutable() {
            return Err(SettlementError::ImmutableRecord {
                entity: "transaction",
                id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Whether moving to `to` must decrement company inventory first.
    #[must_use]
    pub fn requires_inventory_release(&self, to: TransactionStatus) -> bool {
        self.transaction_type == TransactionType::Buy
            && to == TransactionStatus::SharesReleased
            && !self.inventory_released
    }

    /// Whether moving to `to` must re-check company inventory without
    /// decrementing it. True for sell completion.
    #[must_use]
    pub fn requires_inventory_check(&self, to: TransactionStatus) -> bool {
        self.transaction_type == TransactionType::Sell && to == TransactionStatus::Completed
    }

    /// Record that inventory was decremented in the current unit of work.
    pub const fn mark_inventory_released(&mut self) {
        self.inventory_released = true;
    }

    /// Hand back the released share count for restoration, clearing the flag.
    ///
    /// Returns `None` if nothing was released.
    pub const fn take_released_shares(&mut self) -> Option<ShareCount> {
        if self.inventory_released {
            self.inventory_released = false;
            Some(self.requested_shares)
        } else {
            None
        }
    }

    /// Move to `to`, optionally replacing the notes. Stamps `completed_at` on
    /// completion.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the state machine refuses.
    pub fn transition_to(
        &mut self,
        to: TransactionStatus,
        notes: Option<String>,
    ) -> Result<(), SettlementError> {
        TransactionStateMachine::validate_transition(self.transaction_type, self.status, to)?;

        let from = self.status;
        let now = Timestamp::now();
        self.status = to;
        if notes.is_some() {
            self.notes = notes;
        }
        if to == TransactionStatus::Completed {
            self.completed_at = Some(now);
        }
        self.updated_at = now;

        self.events.push(TransactionEvent::StatusChanged {
            transaction_id: self.id.clone(),
            user_id: self.user_id.clone(),
            broker_id: self.broker_id.clone(),
            from,
            to,
            occurred_at: now,
        });
        Ok(())
    }

    /// Attach a payment proof and advance to `PaymentConfirmed`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty URL and `InvalidTransition` unless
    /// the transaction is in `PendingPayment`.
    pub fn record_payment_proof(&mut self, proof_url: String) -> Result<(), SettlementError> {
        if proof_url.trim().is_empty() {
            return Err(SettlementError::validation(
                "paymentProofUrl",
                "must not be empty",
            ));
        }
        if self.status != TransactionStatus::PendingPayment {
            return Err(SettlementError::InvalidTransition {
                entity: "transaction",
                from: self.status.to_string(),
                to: TransactionStatus::PaymentConfirmed.to_string(),
                reason: format!(
                    "Payment proof can only be uploaded while pending_payment, transaction is {}",
                    self.status
                ),
            });
        }

        self.transition_to(TransactionStatus::PaymentConfirmed, None)?;
        self.payment_proof_url = Some(proof_url.clone());
        self.events.push(TransactionEvent::PaymentProofUploaded {
            transaction_id: self.id.clone(),
            user_id: self.user_id.clone(),
            broker_id: self.broker_id.clone(),
            proof_url,
            occurred_at: self.updated_at,
        });
        Ok(())
    }

    /// Apply an amendment. Only allowed while awaiting broker approval.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableRecord` for completed or cancelled transactions,
    /// `Validation` otherwise when the status or values forbid the edit.
    pub fn amend(&mut self, cmd: AmendTransactionCommand) -> Result<(), SettlementError> {
        self.ensure_mutable()?;
        if self.status != TransactionStatus::PendingBrokerApproval {
            return Err(SettlementError::validation(
                "status",
                format!(
                    "transaction can only be edited while pending_broker_approval, it is {}",
                    self.status
                ),
            ));
        }

        if let Some(shares) = cmd.requested_shares {
            shares.validate_for_request("requestedShares")?;
        }
        if let Some(price) = cmd.agreed_price_per_share {
            price.validate_as_price("agreedPricePerShare")?;
        }

        let requested_shares = cmd.requested_shares.unwrap_or(self.requested_shares);
        let agreed_price_per_share = cmd
            .agreed_price_per_share
            .unwrap_or(self.agreed_price_per_share);
        self.total_transaction_value =
            agreed_price_per_share.times_shares(requested_shares, "agreedPricePerShare")?;

        self.requested_shares = requested_shares;
        self.agreed_price_per_share = agreed_price_per_share;
        if cmd.notes.is_some() {
            self.notes = cmd.notes;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Take pending domain events.
    pub fn drain_events(&mut self) -> Vec<TransactionEvent> {
        std::mem::take(&mut self.events)
    }
}
