//! Commission status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    /// Created, awaiting work.
    Pending,
    /// Broker is working the order.
    InProgress,
    /// Settled; inventory released.
    Completed,
    /// Withdrawn.
    Cancelled,
    /// Refused by the broker or admin.
    Rejected,
}

impl CommissionStatus {
    /// Completed and cancelled commissions are immutable.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inprogress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(CommissionStatus::Completed.is_terminal());
        assert!(CommissionStatus::Cancelled.is_terminal());
        assert!(!CommissionStatus::Rejected.is_terminal());
        assert!(!CommissionStatus::Pending.is_terminal());
        assert!(!CommissionStatus::InProgress.is_terminal());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&CommissionStatus::InProgress).unwrap(),
            "\"inprogress\""
        );
        let parsed: CommissionStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, CommissionStatus::Cancelled);
    }
}
