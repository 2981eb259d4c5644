//! In-memory user directory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{StoreError, UserDirectoryPort, UserProfile};
use crate::domain::shared::UserId;

/// User directory backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = UserProfile>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Insert or replace a user.
    pub async fn insert(&self, user: UserProfile) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserDirectoryPort for InMemoryUserDirectory {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Role;

    fn profile(id: &str, role: Role) -> UserProfile {
        UserProfile {
            id: UserId::new(id),
            role,
            name: id.to_string(),
            email: format!("{id}@example.com"),
            commission_rate: None,
        }
    }

    #[tokio::test]
    async fn finds_seeded_and_inserted_users() {
        let directory = InMemoryUserDirectory::with_users([profile("b1", Role::Teller)]);
        directory.insert(profile("c1", Role::Client)).await;

        let broker = directory.find_user_by_id(&UserId::new("b1")).await.unwrap();
        assert_eq!(broker.map(|u| u.role), Some(Role::Teller));
        assert!(directory.find_user_by_id(&UserId::new("c1")).await.unwrap().is_some());
        assert!(directory.find_user_by_id(&UserId::new("zz")).await.unwrap().is_none());
    }
}
