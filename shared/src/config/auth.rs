//! Authentication, session and one-time token configuration

use serde::{Deserialize, Serialize};

use super::{env_or, env_parse_or};

/// Default JWT issuer claim
pub const DEFAULT_ISSUER: &str = "warden";

/// Default JWT audience claim
pub const DEFAULT_AUDIENCE: &str = "warden-api";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing. Empty means "not configured".
    #[serde(default)]
    pub secret: String,

    /// Access token expiry time in seconds
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// JWT audience claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiry: default_access_expiry(),
            refresh_token_expiry: default_refresh_expiry(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Whether a signing secret has been provided
    pub fn has_secret(&self) -> bool {
        !self.secret.trim().is_empty()
    }

    /// Read from `JWT_*` environment variables.
    ///
    /// The secret is never defaulted; a missing `JWT_SECRET` is reported when
    /// the signing engine is constructed.
    pub fn from_env() -> Self {
        Self {
            secret: env_or("JWT_SECRET", ""),
            access_token_expiry: env_parse_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_expiry()),
            refresh_token_expiry: env_parse_or(
                "JWT_REFRESH_TOKEN_EXPIRY",
                default_refresh_expiry(),
            ),
            issuer: env_or("JWT_ISSUER", DEFAULT_ISSUER),
            audience: env_or("JWT_AUDIENCE", DEFAULT_AUDIENCE),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Sliding session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl(),
        }
    }
}

/// Password reset and email verification token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OneTimeTokenConfig {
    /// Password reset token lifetime in seconds
    #[serde(default = "default_password_reset_ttl")]
    pub password_reset_ttl_seconds: i64,

    /// Email verification token lifetime in seconds
    #[serde(default = "default_email_verification_ttl")]
    pub email_verification_ttl_seconds: i64,

    /// Number of random bytes in a generated token (hex encoded)
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
}

impl Default for OneTimeTokenConfig {
    fn default() -> Self {
        Self {
            password_reset_ttl_seconds: default_password_reset_ttl(),
            email_verification_ttl_seconds: default_email_verification_ttl(),
            token_bytes: default_token_bytes(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// One-time token configuration
    #[serde(default)]
    pub one_time: OneTimeTokenConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            session: SessionConfig {
                ttl_seconds: env_parse_or("SESSION_TTL_SECONDS", default_session_ttl()),
            },
            one_time: OneTimeTokenConfig {
                password_reset_ttl_seconds: env_parse_or(
                    "PASSWORD_RESET_TTL_SECONDS",
                    default_password_reset_ttl(),
                ),
                email_verification_ttl_seconds: env_parse_or(
                    "EMAIL_VERIFICATION_TTL_SECONDS",
                    default_email_verification_ttl(),
                ),
                token_bytes: default_token_bytes(),
            },
        }
    }
}

fn default_access_expiry() -> i64 {
    86400 // 24 hours
}

fn default_refresh_expiry() -> i64 {
    604800 // 7 days
}

fn default_issuer() -> String {
    String::from(DEFAULT_ISSUER)
}

fn default_audience() -> String {
    String::from(DEFAULT_AUDIENCE)
}

fn default_session_ttl() -> i64 {
    86400
}

fn default_password_reset_ttl() -> i64 {
    1800 // 30 minutes
}

fn default_email_verification_ttl() -> i64 {
    86400
}

fn default_token_bytes() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 86400);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.issuer, DEFAULT_ISSUER);
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
        assert!(!config.has_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(config.has_secret());
    }

    #[test]
    fn test_whitespace_secret_is_not_configured() {
        assert!(!JwtConfig::new("   ").has_secret());
    }

    #[test]
    fn test_one_time_defaults() {
        let config = OneTimeTokenConfig::default();
        assert_eq!(config.password_reset_ttl_seconds, 1800);
        assert_eq!(config.email_verification_ttl_seconds, 86400);
        assert_eq!(config.token_bytes, 32);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AuthConfig =
            serde_json::from_str(r#"{ "jwt": { "secret": "s3cr3t" } }"#).unwrap();
        assert_eq!(config.jwt.secret, "s3cr3t");
        assert_eq!(config.jwt.refresh_token_expiry, 604800);
        assert_eq!(config.session.ttl_seconds, 86400);
    }
}
