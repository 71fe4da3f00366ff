//! Session service implementation

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use warden_shared::SessionConfig;

use crate::domain::entities::one_time_token::generate_token;
use crate::domain::entities::security_event::SecurityEventType;
use crate::domain::entities::session::Session;
use crate::errors::{AuthError, DomainError};
use crate::services::audit::{ActivityTracker, SecurityEventLog};
use crate::services::lifetime_from_seconds;
use crate::store::{ExpiringStore, Sweep};

/// Bytes of entropy in a session ID
const SESSION_ID_BYTES: usize = 32;

/// Creates, reads, slides and destroys sessions
pub struct SessionService {
    sessions: Arc<ExpiringStore<String, Session>>,
    ttl: Duration,
    audit: Arc<SecurityEventLog>,
    activity: Arc<ActivityTracker>,
}

impl SessionService {
    pub fn new(
        config: &SessionConfig,
        audit: Arc<SecurityEventLog>,
        activity: Arc<ActivityTracker>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            sessions: Arc::new(ExpiringStore::new("sessions")),
            ttl: lifetime_from_seconds("session ttl", config.ttl_seconds)?,
            audit,
            activity,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session for `user_id` and returns its ID
    pub async fn create(&self, user_id: Uuid, extra: Option<Map<String, JsonValue>>) -> String {
        let now = Utc::now();
        let session_id = generate_token(SESSION_ID_BYTES);
        let session = Session::new(
            session_id.clone(),
            user_id,
            extra.unwrap_or_default(),
            self.ttl,
            now,
        );
        let expires_at = session.expires_at;

        self.sessions
            .put(session_id.clone(), session, expires_at)
            .await;
        self.audit
            .record(user_id, SecurityEventType::SessionCreated, json!({}))
            .await;
        self.activity.record_activity_at(user_id, "session_create", now).await;

        debug!(user_id = %user_id, "Session created");
        session_id
    }

    /// Live session, if any. A successful read slides the expiry like
    /// [`Self::touch`] without changing any fields.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.get_at(session_id, Utc::now()).await
    }

    pub(crate) async fn get_at(&self, session_id: &str, now: DateTime<Utc>) -> Option<Session> {
        self.touch_at(session_id, None, now).await.ok()
    }

    /// Merges `updates` and slides the expiry to now + TTL
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - The updated session
    /// * `Err(AuthError::SessionNotFound)` - Missing or expired
    pub async fn touch(
        &self,
        session_id: &str,
        updates: Option<Map<String, JsonValue>>,
    ) -> Result<Session, DomainError> {
        self.touch_at(session_id, updates, Utc::now()).await
    }

    pub(crate) async fn touch_at(
        &self,
        session_id: &str,
        updates: Option<Map<String, JsonValue>>,
        now: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        let ttl = self.ttl;
        self.sessions
            .update_at(&session_id.to_string(), now, |session, expires_at| {
                session.touch(updates.unwrap_or_default(), ttl, now);
                *expires_at = session.expires_at;
            })
            .await
            .ok_or_else(|| AuthError::SessionNotFound.into())
    }

    /// Removes the session; a missing ID is not an error
    pub async fn destroy(&self, session_id: &str) {
        if let Some(session) = self.sessions.remove(&session_id.to_string()).await {
            self.audit
                .record(session.user_id, SecurityEventType::SessionDestroyed, json!({}))
                .await;
            debug!(user_id = %session.user_id, "Session destroyed");
        }
    }

    /// Removes every session of `user_id`; returns how many
    pub async fn destroy_all_for_user(&self, user_id: Uuid) -> usize {
        let removed = self
            .sessions
            .remove_where(|_, session| session.user_id == user_id)
            .await;
        if removed > 0 {
            self.audit
                .record(
                    user_id,
                    SecurityEventType::SessionDestroyed,
                    json!({ "count": removed }),
                )
                .await;
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.len().await
    }

    pub(crate) fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
        vec![self.sessions.clone()]
    }
}
