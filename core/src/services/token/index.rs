//! Per-user set of live refresh token IDs

use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Maps each user to the IDs of their live refresh tokens.
///
/// A token ID belongs to at most one user, and a user whose set becomes
/// empty is dropped from the map.
#[derive(Debug, Default)]
pub struct UserTokenIndex {
    entries: RwLock<HashMap<Uuid, HashSet<String>>>,
}

impl UserTokenIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, user_id: Uuid, token_id: &str) {
        let mut entries = self.entries.write().await;
        entries
            .entry(user_id)
            .or_default()
            .insert(token_id.to_string());
    }

    /// Remove `token_id` from `user_id`'s set; returns whether it was present
    pub async fn remove(&self, user_id: Uuid, token_id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let Some(ids) = entries.get_mut(&user_id) else {
            return false;
        };
        let removed = ids.remove(token_id);
        if ids.is_empty() {
            entries.remove(&user_id);
        }
        removed
    }

    /// Detach and return the user's whole set in one step
    pub async fn take_all(&self, user_id: Uuid) -> HashSet<String> {
        self.entries
            .write()
            .await
            .remove(&user_id)
            .unwrap_or_default()
    }

    pub async fn count(&self, user_id: Uuid) -> usize {
        self.entries
            .read()
            .await
            .get(&user_id)
            .map_or(0, HashSet::len)
    }

    /// Number of users with at least one live token
    pub async fn users(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Every (user, token ID) pair currently indexed
    pub async fn snapshot(&self) -> Vec<(Uuid, String)> {
        self.entries
            .read()
            .await
            .iter()
            .flat_map(|(user_id, ids)| ids.iter().map(move |id| (*user_id, id.clone())))
            .collect()
    }
}
