//! Single-use tokens for password reset and email verification.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a one-time token authorises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneTimePurpose {
    PasswordReset,
    EmailVerification,
}

impl fmt::Display for OneTimePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneTimePurpose::PasswordReset => write!(f, "password_reset"),
            OneTimePurpose::EmailVerification => write!(f, "email_verification"),
        }
    }
}

/// Stored payload for a one-time token. The token string itself is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeToken {
    pub purpose: OneTimePurpose,

    pub user_id: Uuid,

    /// Address being verified (email verification only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

/// Result of issuing a one-time token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generates a hex-encoded random token of `bytes` bytes of entropy
pub fn generate_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}
