//! Security event and activity entities for auditing credential lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Event types recorded by the auth core
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventType {
    // Token events
    TokenRefreshed,
    TokenRevoked,
    AllTokensRevoked,
    RefreshReplayDetected,

    // One-time token events
    PasswordResetRequested,
    PasswordResetCompleted,
    EmailVerificationRequested,
    EmailVerified,

    // Session events
    SessionCreated,
    SessionDestroyed,

    // Reported by collaborators
    LoginFailure,
}

impl SecurityEventType {
    /// String representation used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::AllTokensRevoked => "ALL_TOKENS_REVOKED",
            Self::RefreshReplayDetected => "REFRESH_REPLAY_DETECTED",
            Self::PasswordResetRequested => "PASSWORD_RESET_REQUESTED",
            Self::PasswordResetCompleted => "PASSWORD_RESET_COMPLETED",
            Self::EmailVerificationRequested => "EMAIL_VERIFICATION_REQUESTED",
            Self::EmailVerified => "EMAIL_VERIFIED",
            Self::SessionCreated => "SESSION_CREATED",
            Self::SessionDestroyed => "SESSION_DESTROYED",
            Self::LoginFailure => "LOGIN_FAILURE",
        }
    }

    /// Whether the event indicates a possible attack
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Self::RefreshReplayDetected | Self::LoginFailure)
    }
}

/// An append-only audit record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    /// Unique identifier for the event
    pub id: Uuid,

    pub user_id: Uuid,

    pub event_type: SecurityEventType,

    /// Additional event data in JSON format
    #[serde(default)]
    pub details: JsonValue,

    pub created_at: DateTime<Utc>,
}

impl SecurityEvent {
    pub fn new(user_id: Uuid, event_type: SecurityEventType, details: JsonValue) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event_type,
            details,
            created_at: Utc::now(),
        }
    }
}

/// Most recent activity seen for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub user_id: Uuid,

    /// Short action label, e.g. "token_refresh"
    pub action: String,

    pub at: DateTime<Utc>,
}
