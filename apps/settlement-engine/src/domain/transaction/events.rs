//! Domain events for share transactions.

use serde::{Deserialize, Serialize};

use super::value_objects::{TransactionStatus, TransactionType};
use crate::domain::shared::{Money, Timestamp, TransactionId, UserId};

/// Transaction lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionEvent {
    /// Request submitted.
    Created {
        /// Transaction ID.
        transaction_id: TransactionId,
        /// Buy or sell.
        transaction_type: TransactionType,
        /// Customer.
        user_id: UserId,
        /// Broker.
        broker_id: UserId,
        /// Shares × agreed price.
        total_transaction_value: Money,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
    /// Status changed.
    StatusChanged {
        /// Transaction ID.
        transaction_id: TransactionId,
        /// Customer.
        user_id: UserId,
        /// Broker.
        broker_id: UserId,
        /// Previous status.
        from: TransactionStatus,
        /// New status.
        to: TransactionStatus,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
    /// Customer attached a proof of payment.
    PaymentProofUploaded {
        /// Transaction ID.
        transaction_id: TransactionId,
        /// Customer.
        user_id: UserId,
        /// Broker.
        broker_id: UserId,
        /// Where the proof is stored.
        proof_url: String,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
}

impl TransactionEvent {
    /// Transaction the event belongs to.
    #[must_use]
    pub const fn transaction_id(&self) -> &TransactionId {
        match self {
            Self::Created { transaction_id, .. }
            | Self::StatusChanged { transaction_id, .. }
            | Self::PaymentProofUploaded { transaction_id, .. } => transaction_id,
        }
    }

    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "TRANSACTION_CREATED",
            Self::StatusChanged { .. } => "TRANSACTION_STATUS_CHANGED",
            Self::PaymentProofUploaded { .. } => "TRANSACTION_PAYMENT_PROOF_UPLOADED",
        }
    }
}
