//! Transaction State Machine Service
//!
//! Validates transaction status transitions. The allowed graph depends on the
//! transaction type: buys go through payment, sells through a market listing.

use crate::domain::transaction::value_objects::{TransactionStatus, TransactionType};
use crate::error::SettlementError;

/// Transaction state machine.
pub struct TransactionStateMachine;

impl TransactionStateMachine {
    /// Check if a state transition is valid for the given transaction type.
    #[must_use]
    pub const fn is_valid_transition(
        kind: TransactionType,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> bool {
        use TransactionStatus as S;

        if from.is_terminal() {
            return false;
        }
        // Any open transaction can be cancelled or rejected
        if matches!(to, S::Cancelled | S::Rejected) {
            return true;
        }

        match kind {
            TransactionType::Buy => matches!(
                (from, to),
                (S::PendingBrokerApproval, S::PendingPayment)
                    | (S::PendingPayment, S::PaymentConfirmed)
                    | (S::PaymentConfirmed, S::SharesReleased)
                    | (S::SharesReleased, S::Completed)
            ),
            TransactionType::Sell => matches!(
                (from, to),
                (S::PendingBrokerApproval, S::PendingMarketListing)
                    | (S::PendingMarketListing, S::ListedOnMarket)
                    | (S::ListedOnMarket, S::Completed)
            ),
        }
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the transition is not permitted.
    pub fn validate_transition(
        kind: TransactionType,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<(), SettlementError> {
        if Self::is_valid_transition(kind, from, to) {
            Ok(())
        } else {
            Err(SettlementError::InvalidTransition {
                entity: "transaction",
                from: from.to_string(),
                to: to.to_string(),
                reason: Self::transition_error_reason(kind, from, to),
            })
        }
    }

    /// Human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(
        kind: TransactionType,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> String {
        if from.is_terminal() {
            format!("Cannot modify {from} transaction")
        } else if from == to {
            format!("Transaction is already {to}")
        } else if matches!(
            (kind, to),
            (
                TransactionType::Buy,
                TransactionStatus::PendingMarketListing | TransactionStatus::ListedOnMarket
            ) | (
                TransactionType::Sell,
                TransactionStatus::PendingPayment
                    | TransactionStatus::PaymentConfirmed
                    | TransactionStatus::SharesReleased
            )
        ) {
            format!("{to} does not apply to {kind} transactions")
        } else {
            format!("Invalid transition from {from} to {to}")
        }
    }

    /// All valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(
        kind: TransactionType,
        from: TransactionStatus,
    ) -> Vec<TransactionStatus> {
        use TransactionStatus as S;

        let forward = match (kind, from) {
            (_, S::Completed | S::Cancelled | S::Rejected) => return vec![],
            (TransactionType::Buy, S::PendingBrokerApproval) => Some(S::PendingPayment),
            (TransactionType::Buy, S::PendingPayment) => Some(S::PaymentConfirmed),
            (TransactionType::Buy, S::PaymentConfirmed) => Some(S::SharesReleased),
            (TransactionType::Buy, S::SharesReleased) => Some(S::Completed),
            (TransactionType::Sell, S::PendingBrokerApproval) => Some(S::PendingMarketListing),
            (TransactionType::Sell, S::PendingMarketListing) => Some(S::ListedOnMarket),
            (TransactionType::Sell, S::ListedOnMarket) => Some(S::Completed),
            _ => None,
        };

        forward
            .into_iter()
            .chain([S::Cancelled, S::Rejected])
            .collect()
    }
}
