//! Domain events for commissions.

use serde::{Deserialize, Serialize};

use super::value_objects::CommissionStatus;
use crate::domain::shared::{CommissionId, Money, Timestamp, UserId};

/// Commission lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionEvent {
    /// Commission recorded.
    Created {
        /// Commission ID.
        commission_id: CommissionId,
        /// Broker.
        broker_id: UserId,
        /// Customer.
        customer_id: UserId,
        /// Commission earned on completion.
        commission_amount: Money,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
    /// Status changed.
    StatusChanged {
        /// Commission ID.
        commission_id: CommissionId,
        /// Broker.
        broker_id: UserId,
        /// Customer.
        customer_id: UserId,
        /// Previous status.
        from: CommissionStatus,
        /// New status.
        to: CommissionStatus,
        /// When the event occurred.
        occurred_at: Timestamp,
    },
}

impl CommissionEvent {
    /// Commission the event belongs to.
    #[must_use]
    pub const fn commission_id(&self) -> &CommissionId {
        match self {
            Self::Created { commission_id, .. } | Self::StatusChanged { commission_id, .. } => {
                commission_id
            }
        }
    }

    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "COMMISSION_CREATED",
            Self::StatusChanged { .. } => "COMMISSION_STATUS_CHANGED",
        }
    }
}
