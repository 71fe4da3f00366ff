//! In-memory implementation of UserRepository for development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::UserRecord;
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// Map-backed user repository
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user
    pub async fn insert(&self, user: UserRecord) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }

    /// Flip the active flag; returns false if the user does not exist
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// Remove a user
    pub async fn remove(&self, id: Uuid) -> Option<UserRecord> {
        let mut users = self.users.write().await;
        users.remove(&id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("user {}", id)))?;
        user.update_last_login();
        Ok(())
    }
}
