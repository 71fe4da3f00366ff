//! Generic keyed container with per-entry absolute expiry
//!
//! Entries are logically gone once `now > expires_at`. Reads that hit such an
//! entry delete it on the spot (lazy expiry); [`ExpiringStore::sweep`] removes
//! the rest in bulk and is driven by the janitor.
//!
//! Each call takes the store's lock once, so every public method is a single
//! critical section. Conditional operations (`take_if_at`, `update_at`,
//! `upsert_at`) run their closure under that lock, which is what makes
//! check-then-act sequences on the same key race free.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

use super::Sweep;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of a lookup that distinguishes "never there" from "expired"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Live(V),
    Expired,
    Missing,
}

impl<V> Lookup<V> {
    pub fn into_live(self) -> Option<V> {
        match self {
            Lookup::Live(value) => Some(value),
            _ => None,
        }
    }
}

/// Result of [`ExpiringStore::take_if_at`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Take<V> {
    /// Entry was live and accepted; it has been removed
    Taken(V),
    /// Entry was live but the predicate refused it; it is left in place
    Rejected,
    /// Entry had expired; it has been removed
    Expired,
    Missing,
}

/// Keyed map with absolute per-entry expiry
pub struct ExpiringStore<K, V> {
    name: &'static str,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> ExpiringStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Create an empty store. `name` is used in logs and status output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Insert or replace `key`
    pub async fn put(&self, key: K, value: V, expires_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        entries.insert(key, Entry { value, expires_at });
    }

    /// Live value for `key`, lazily deleting it if expired
    pub async fn get(&self, key: &K) -> Option<V> {
        self.lookup_at(key, Utc::now()).await.into_live()
    }

    /// Lookup at an explicit instant
    pub async fn lookup_at(&self, key: &K, now: DateTime<Utc>) -> Lookup<V> {
        self.get_with_expiry_at(key, now)
            .await
            .map_or_else(|expired| expired, |(value, _)| Lookup::Live(value))
    }

    /// Live value and its expiry, or the reason there is none
    pub async fn get_with_expiry_at(
        &self,
        key: &K,
        now: DateTime<Utc>,
    ) -> Result<(V, DateTime<Utc>), Lookup<V>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Err(Lookup::Missing),
                Some(entry) if !entry.is_expired(now) => {
                    return Ok((entry.value.clone(), entry.expires_at));
                }
                Some(_) => {}
            }
        }

        // Expired: upgrade and delete, re-checking in case it was replaced meanwhile
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            None => Err(Lookup::Expired),
            Some(entry) if !entry.is_expired(now) => Ok((entry.value.clone(), entry.expires_at)),
            Some(_) => {
                entries.remove(key);
                Err(Lookup::Expired)
            }
        }
    }

    /// Whether a live entry exists at `now`
    pub async fn contains_at(&self, key: &K, now: DateTime<Utc>) -> bool {
        matches!(self.lookup_at(key, now).await, Lookup::Live(_))
    }

    /// Remove `key` unconditionally, returning whatever was stored (expired or not)
    pub async fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().await;
        entries.remove(key).map(|entry| entry.value)
    }

    /// Atomically remove `key` if it is live and `accept` returns true
    pub async fn take_if_at<F>(&self, key: &K, now: DateTime<Utc>, accept: F) -> Take<V>
    where
        F: FnOnce(&V) -> bool,
    {
        let mut entries = self.entries.write().await;
        let (expired, accepted) = match entries.get(key) {
            None => return Take::Missing,
            Some(entry) if entry.is_expired(now) => (true, false),
            Some(entry) => (false, accept(&entry.value)),
        };

        if expired {
            entries.remove(key);
            return Take::Expired;
        }
        if !accepted {
            return Take::Rejected;
        }

        match entries.remove(key) {
            Some(entry) => Take::Taken(entry.value),
            None => Take::Missing,
        }
    }

    /// Mutate a live entry in place and return its new value.
    ///
    /// The closure may move the expiry. Expired entries are deleted and yield
    /// `None`.
    pub async fn update_at<F>(&self, key: &K, now: DateTime<Utc>, update: F) -> Option<V>
    where
        F: FnOnce(&mut V, &mut DateTime<Utc>),
    {
        let mut entries = self.entries.write().await;
        if entries.get(key)?.is_expired(now) {
            entries.remove(key);
            return None;
        }

        let entry = entries.get_mut(key)?;
        update(&mut entry.value, &mut entry.expires_at);
        Some(entry.value.clone())
    }

    /// Update a live entry, or (re)create it when missing or expired.
    ///
    /// Returns the resulting value and expiry.
    pub async fn upsert_at<I, U>(
        &self,
        key: K,
        now: DateTime<Utc>,
        insert: I,
        update: U,
    ) -> (V, DateTime<Utc>)
    where
        I: FnOnce() -> (V, DateTime<Utc>),
        U: FnOnce(&mut V, &mut DateTime<Utc>),
    {
        let mut entries = self.entries.write().await;
        let live = entries
            .get(&key)
            .map_or(false, |entry| !entry.is_expired(now));

        if live {
            if let Some(entry) = entries.get_mut(&key) {
                update(&mut entry.value, &mut entry.expires_at);
                return (entry.value.clone(), entry.expires_at);
            }
        }

        let (value, expires_at) = insert();
        entries.insert(key, Entry { value: value.clone(), expires_at });
        (value, expires_at)
    }

    /// Live values matching `filter`
    pub async fn values_where<F>(&self, now: DateTime<Utc>, filter: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let entries = self.entries.read().await;
        entries
            .values()
            .filter(|entry| !entry.is_expired(now) && filter(&entry.value))
            .map(|entry| entry.value.clone())
            .collect()
    }

    /// Remove every entry (live or not) matching `filter`; returns the count
    pub async fn remove_where<F>(&self, filter: F) -> usize
    where
        F: Fn(&K, &V) -> bool,
    {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, entry| !filter(key, &entry.value));
        before - entries.len()
    }

    /// Remove all entries with `expires_at < now`; returns the count
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        before - entries.len()
    }

    /// Physically present entries, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<K, V> Sweep for ExpiringStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        ExpiringStore::sweep(self, now).await
    }

    async fn len(&self) -> usize {
        ExpiringStore::len(self).await
    }
}
