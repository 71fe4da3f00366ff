//! Security event log and activity tracker.
//!
//! Both are append/overwrite-only views over expiring stores: events age out
//! after the retention window, per-user counters after their rolling window.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;
use warden_shared::AuditConfig;

use crate::domain::entities::security_event::{ActivityRecord, SecurityEvent, SecurityEventType};
use crate::errors::DomainError;
use crate::services::lifetime_from_seconds;
use crate::store::{ExpiringStore, Sweep};

/// Append-only security events plus rolling per-user/per-type counters
pub struct SecurityEventLog {
    events: Arc<ExpiringStore<Uuid, SecurityEvent>>,
    counters: Arc<ExpiringStore<(Uuid, SecurityEventType), u64>>,
    retention: Duration,
    counter_window: Duration,
}

impl SecurityEventLog {
    pub fn new(config: &AuditConfig) -> Result<Self, DomainError> {
        Ok(Self {
            events: Arc::new(ExpiringStore::new("security_events")),
            counters: Arc::new(ExpiringStore::new("security_event_counters")),
            retention: lifetime_from_seconds(
                "event retention",
                config.event_retention_seconds,
            )?,
            counter_window: lifetime_from_seconds(
                "counter window",
                config.counter_window_seconds,
            )?,
        })
    }

    /// Record an event and bump its rolling counter
    pub async fn record(
        &self,
        user_id: Uuid,
        event_type: SecurityEventType,
        details: JsonValue,
    ) -> SecurityEvent {
        let event = SecurityEvent::new(user_id, event_type, details);
        let now = event.created_at;

        self.events
            .put(event.id, event.clone(), now + self.retention)
            .await;

        let window = self.counter_window;
        let (count, _) = self
            .counters
            .upsert_at(
                (user_id, event_type),
                now,
                move || (1, now + window),
                |count, _| *count += 1,
            )
            .await;

        if event_type.is_suspicious() {
            warn!(
                user_id = %user_id,
                event = event_type.as_str(),
                count_in_window = count,
                "Security event recorded"
            );
        } else {
            debug!(user_id = %user_id, event = event_type.as_str(), "Security event recorded");
        }

        event
    }

    /// Occurrences of `event_type` for `user_id` in the current counter window
    pub async fn count(&self, user_id: Uuid, event_type: SecurityEventType) -> u64 {
        self.counters
            .get(&(user_id, event_type))
            .await
            .unwrap_or(0)
    }

    /// Retained events for `user_id`, newest first
    pub async fn recent_for_user(&self, user_id: Uuid) -> Vec<SecurityEvent> {
        let mut events = self
            .events
            .values_where(Utc::now(), |event| event.user_id == user_id)
            .await;
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events
    }

    pub async fn len(&self) -> usize {
        self.events.len().await
    }

    /// Number of live per-user/per-type counters
    pub async fn counter_len(&self) -> usize {
        self.counters.len().await
    }

    pub(crate) fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
        vec![self.events.clone(), self.counters.clone()]
    }
}

/// Last activity per user
pub struct ActivityTracker {
    records: Arc<ExpiringStore<Uuid, ActivityRecord>>,
    retention: Duration,
}

impl ActivityTracker {
    pub fn new(config: &AuditConfig) -> Result<Self, DomainError> {
        Ok(Self {
            records: Arc::new(ExpiringStore::new("activity")),
            retention: lifetime_from_seconds(
                "activity retention",
                config.activity_retention_seconds,
            )?,
        })
    }

    /// Overwrite the user's last activity
    pub async fn record_activity(&self, user_id: Uuid, action: impl Into<String>) {
        self.record_activity_at(user_id, action, Utc::now()).await
    }

    pub(crate) async fn record_activity_at(
        &self,
        user_id: Uuid,
        action: impl Into<String>,
        at: DateTime<Utc>,
    ) {
        let record = ActivityRecord {
            user_id,
            action: action.into(),
            at,
        };
        self.records.put(user_id, record, at + self.retention).await;
    }

    pub async fn last_activity(&self, user_id: Uuid) -> Option<ActivityRecord> {
        self.records.get(&user_id).await
    }

    pub async fn len(&self) -> usize {
        self.records.len().await
    }

    pub(crate) fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
        vec![self.records.clone()]
    }
}
