//! Opaque server-side session entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// A server-side session with sliding expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session handle given to the client
    pub session_id: String,

    /// Owner of the session
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,

    /// Last successful read/update through `touch`
    pub last_activity: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Caller-defined fields, merged on `touch`
    #[serde(default)]
    pub data: Map<String, JsonValue>,
}

impl Session {
    pub fn new(
        session_id: String,
        user_id: Uuid,
        data: Map<String, JsonValue>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            user_id,
            created_at: now,
            last_activity: now,
            expires_at: now + ttl,
            data,
        }
    }

    /// Merge `updates` into the session data and slide the expiry forward.
    ///
    /// Keys in `updates` overwrite existing keys; other keys are kept.
    pub fn touch(&mut self, updates: Map<String, JsonValue>, ttl: Duration, now: DateTime<Utc>) {
        for (key, value) in updates {
            self.data.insert(key, value);
        }
        self.last_activity = now;
        self.expires_at = now + ttl;
    }
}
