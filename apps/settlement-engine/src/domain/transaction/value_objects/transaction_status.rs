//! Transaction status in the settlement lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction status.
///
/// Buy path: `PendingBrokerApproval` -> `PendingPayment` -> `PaymentConfirmed`
/// -> `SharesReleased` -> `Completed`.
/// Sell path: `PendingBrokerApproval` -> `PendingMarketListing` ->
/// `ListedOnMarket` -> `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Initial state; waiting for the broker.
    PendingBrokerApproval,
    /// Buy approved; waiting for the customer's payment.
    PendingPayment,
    /// Payment proof received or confirmed by the broker.
    PaymentConfirmed,
    /// Inventory decremented for this buy.
    SharesReleased,
    /// Settled.
    Completed,
    /// Withdrawn.
    Cancelled,
    /// Refused by the broker or admin.
    Rejected,
    /// Sell approved; waiting to be listed.
    PendingMarketListing,
    /// Sell listed on the market.
    ListedOnMarket,
}

impl TransactionStatus {
    /// No transition leaves a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }

    /// Completed and cancelled transactions cannot be edited or deleted.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Waiting on an external party (broker, payment or listing).
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingBrokerApproval | Self::PendingPayment | Self::PendingMarketListing
        )
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingBrokerApproval => "pending_broker_approval",
            Self::PendingPayment => "pending_payment",
            Self::PaymentConfirmed => "payment_confirmed",
            Self::SharesReleased => "shares_released",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
            Self::PendingMarketListing => "pending_market_listing",
            Self::ListedOnMarket => "listed_on_market",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TransactionStatus::PendingBrokerApproval).unwrap();
        assert_eq!(json, "\"pending_broker_approval\"");
        let parsed: TransactionStatus = serde_json::from_str("\"listed_on_market\"").unwrap();
        assert_eq!(parsed, TransactionStatus::ListedOnMarket);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(TransactionStatus::SharesReleased.to_string(), "shares_released");
    }

    #[test]
    fn rejected_is_terminal_but_not_immutable() {
        assert!(TransactionStatus::Rejected.is_terminal());
        assert!(!TransactionStatus::Rejected.is_immutable());
        assert!(TransactionStatus::Completed.is_immutable());
    }
}
