//! In-memory storage primitives shared by every service.

mod expiring_store;


use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use expiring_store::{ExpiringStore, Lookup, Take};

/// Something the janitor can purge of expired state
#[async_trait]
pub trait Sweep: Send + Sync {
    /// Label used in logs and sweep reports
    fn name(&self) -> &'static str;

    /// Remove everything that expired before `now`; returns how many entries went
    async fn sweep(&self, now: DateTime<Utc>) -> usize;

    /// Current number of physically held entries
    async fn len(&self) -> usize;
}
