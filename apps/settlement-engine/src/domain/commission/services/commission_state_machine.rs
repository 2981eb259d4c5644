//! Commission State Machine Service
//!
//! Validates commission status transitions.

use crate::domain::commission::value_objects::CommissionStatus;
use crate::error::SettlementError;

/// Commission state machine.
pub struct CommissionStateMachine;

impl CommissionStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: CommissionStatus, to: CommissionStatus) -> bool {
        matches!(
            (from, to),
            // From Pending
            (CommissionStatus::Pending, CommissionStatus::InProgress)
                | (CommissionStatus::Pending, CommissionStatus::Completed)
                | (CommissionStatus::Pending, CommissionStatus::Cancelled)
                | (CommissionStatus::Pending, CommissionStatus::Rejected)
                // From InProgress
                | (CommissionStatus::InProgress, CommissionStatus::Pending)
                | (CommissionStatus::InProgress, CommissionStatus::Completed)
                | (CommissionStatus::InProgress, CommissionStatus::Cancelled)
                | (CommissionStatus::InProgress, CommissionStatus::Rejected)
                // From Rejected (reopen or withdraw)
                | (CommissionStatus::Rejected, CommissionStatus::Pending)
                | (CommissionStatus::Rejected, CommissionStatus::Cancelled)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the transition is not permitted.
    pub fn validate_transition(
        from: CommissionStatus,
        to: CommissionStatus,
    ) -> Result<(), SettlementError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(SettlementError::InvalidTransition {
                entity: "commission",
                from: from.to_string(),
                to: to.to_string(),
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: CommissionStatus, to: CommissionStatus) -> String {
        if from.is_terminal() {
            format!("Cannot modify {from} commission")
        } else if from == to {
            format!("Commission is already {to}")
        } else {
            format!("Invalid transition from {from} to {to}")
        }
    }

    /// All valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: CommissionStatus) -> Vec<CommissionStatus> {
        match from {
            CommissionStatus::Pending => vec![
                CommissionStatus::InProgress,
                CommissionStatus::Completed,
                CommissionStatus::Cancelled,
                CommissionStatus::Rejected,
            ],
            CommissionStatus::InProgress => vec![
                CommissionStatus::Pending,
                CommissionStatus::Completed,
                CommissionStatus::Cancelled,
                CommissionStatus::Rejected,
            ],
            CommissionStatus::Rejected => {
                vec![CommissionStatus::Pending, CommissionStatus::Cancelled]
            }
            // Terminal states
            CommissionStatus::Completed | CommissionStatus::Cancelled => vec![],
        }
    }
}
