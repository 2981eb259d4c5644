//! The acting user of a request.

use super::{Action, CapabilityTable, Role};
use crate::domain::shared::UserId;
use crate::error::SettlementError;

/// Authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User ID.
    pub user_id: UserId,
    /// Role from the user directory.
    pub role: Role,
}

impl Actor {
    /// Create an actor.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Whether the actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Check the capability table.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the role may not perform `action`.
    pub fn authorize(&self, action: Action) -> Result<(), SettlementError> {
        if CapabilityTable::allows(self.role, action) {
            Ok(())
        } else {
            Err(SettlementError::Forbidden(format!(
                "role '{}' may not {action}",
                self.role
            )))
        }
    }

    /// Check that a non-admin actor is one of the record's parties.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the actor is neither admin, broker nor customer
    /// of the record.
    pub fn ensure_party(&self, broker_id: &UserId, customer_id: &UserId) -> Result<(), SettlementError> {
        if self.is_admin() || &self.user_id == broker_id || &self.user_id == customer_id {
            Ok(())
        } else {
            Err(SettlementError::Forbidden(
                "record belongs to another user".to_string(),
            ))
        }
    }

    /// Check that a non-admin actor is the record's broker.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the actor is admin or the broker.
    pub fn ensure_broker_of(&self, broker_id: &UserId) -> Result<(), SettlementError> {
        if self.is_admin() || &self.user_id == broker_id {
            Ok(())
        } else {
            Err(SettlementError::Forbidden(
                "only the assigned broker may do this".to_string(),
            ))
        }
    }
}
