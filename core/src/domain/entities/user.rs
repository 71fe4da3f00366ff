//! User record as seen by the auth core.
//!
//! The full user entity lives with the user-record collaborator; the core only
//! needs to know whether the account may hold credentials and what role to
//! stamp into access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Projection of a user returned by [`crate::repositories::UserRepository`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Whether the account is allowed to authenticate
    pub is_active: bool,

    /// Role / user type, copied into access tokens
    pub role: Option<String>,

    /// Timestamp of the user's last login or token refresh
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates an active user with the given role
    pub fn new(id: Uuid, role: Option<String>) -> Self {
        Self {
            id,
            is_active: true,
            role,
            last_login_at: None,
        }
    }

    /// Marks the account inactive
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Updates the last login timestamp
    pub fn update_last_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }
}
