//! User lookups shared by the engines.

use std::sync::Arc;

use crate::application::dto::PartySummary;
use crate::application::ports::{UserDirectoryPort, UserProfile};
use crate::domain::access::Actor;
use crate::domain::shared::UserId;
use crate::error::SettlementError;

/// Resolves actors and validates the parties named on a record.
pub struct Directory<U: UserDirectoryPort> {
    users: Arc<U>,
}

impl<U: UserDirectoryPort> Clone for Directory<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U: UserDirectoryPort> Directory<U> {
    /// Wrap a user directory.
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Underlying port.
    pub fn users(&self) -> &Arc<U> {
        &self.users
    }

    /// Turn a caller-supplied user ID into an actor.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` if the user is unknown.
    pub async fn resolve_actor(&self, id: &UserId) -> Result<Actor, SettlementError> {
        let user = self
            .users
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| SettlementError::Unauthenticated(format!("unknown user '{id}'")))?;
        Ok(Actor::new(user.id, user.role))
    }

    /// Load a user that must act as broker (teller or agent).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if missing, `Validation` if the role is wrong.
    pub async fn require_broker(&self, id: &UserId) -> Result<UserProfile, SettlementError> {
        let user = self.require(id, "broker").await?;
        if user.role.is_broker() {
            Ok(user)
        } else {
            Err(SettlementError::validation(
                "brokerId",
                format!("user '{id}' is a {}, expected teller or agent", user.role),
            ))
        }
    }

    /// Load a user that must act as customer (client).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if missing, `Validation` if the role is wrong.
    pub async fn require_customer(
        &self,
        id: &UserId,
        field: &str,
    ) -> Result<UserProfile, SettlementError> {
        let user = self.require(id, "customer").await?;
        if user.role.is_customer() {
            Ok(user)
        } else {
            Err(SettlementError::validation(
                field,
                format!("user '{id}' is a {}, expected client", user.role),
            ))
        }
    }

    /// Summary for a read model; `None` if the user has since disappeared.
    pub async fn summary(&self, id: &UserId) -> Result<Option<PartySummary>, SettlementError> {
        Ok(self
            .users
            .find_user_by_id(id)
            .await?
            .as_ref()
            .map(PartySummary::from))
    }

    async fn require(
        &self,
        id: &UserId,
        entity: &'static str,
    ) -> Result<UserProfile, SettlementError> {
        self.users
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| SettlementError::not_found(entity, id))
    }
}
