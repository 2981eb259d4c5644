//! User Directory Port (Driven Port)
//!
//! Read-only lookup of users, their roles and broker commission rates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::domain::access::Role;
use crate::domain::shared::{CommissionRate, UserId};

/// A user as seen by the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID.
    pub id: UserId,
    /// Role.
    pub role: Role,
    /// Display name.
    pub name: String,
    /// Email address for notifications.
    pub email: String,
    /// Broker's default commission rate, if configured.
    #[serde(default)]
    pub commission_rate: Option<CommissionRate>,
}

/// Port for resolving users.
#[async_trait]
pub trait UserDirectoryPort: Send + Sync {
    /// Find a user by ID.
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError>;
}
