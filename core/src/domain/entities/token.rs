//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Distinguishes access tokens from refresh tokens inside the signed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID. For refresh tokens this is the server-side token ID.
    pub jti: String,

    /// Access or refresh
    pub kind: TokenKind,

    /// User role, carried on access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Creates new claims expiring `ttl` from now with a fresh random `jti`
    pub fn new(
        user_id: Uuid,
        kind: TokenKind,
        role: Option<String>,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + ttl;

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
            kind,
            role,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// The refresh token ID, if these are refresh claims
    pub fn token_id(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Refresh if !self.jti.is_empty() => Some(&self.jti),
            _ => None,
        }
    }

    /// Expiry as a timestamp, `None` if `exp` is out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Server-side record for an issued refresh token, keyed by token ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Token ID (the refresh token's `jti`)
    pub token_id: String,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// SHA-256 of the raw token as presented to the client
    pub token_hash: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last successful use
    pub last_used_at: DateTime<Utc>,

    /// Free-form client description (user agent, device name)
    pub device_info: Option<String>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(
        token_id: String,
        user_id: Uuid,
        token_hash: String,
        device_info: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            token_id,
            user_id,
            token_hash,
            created_at: now,
            last_used_at: now,
            device_info,
            expires_at,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// Why a token ID was blacklisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    /// Exchanged for a new pair via refresh
    Rotated,
    /// Explicit single-token revocation (logout)
    Revoked,
    /// Part of a revoke-all-for-user sweep
    RevokedAll,
}

/// Blacklist entry; its store expiry is one second past the revoked token's `exp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub reason: RevocationReason,
    pub revoked_at: DateTime<Utc>,
}

impl BlacklistEntry {
    pub fn new(reason: RevocationReason) -> Self {
        Self {
            reason,
            revoked_at: Utc::now(),
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
