//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use warden_shared::JwtConfig;

use crate::errors::DomainError;
use crate::services::lifetime_from_seconds;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family)
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// `iss` claim written and required
    pub issuer: String,
    /// `aud` claim written and required
    pub audience: String,
}

impl TokenServiceConfig {
    /// Configuration with the given secret and default lifetimes
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Self::default()
        }
    }
}

impl TryFrom<&JwtConfig> for TokenServiceConfig {
    type Error = DomainError;

    /// Fails with `DomainError::Config` when a lifetime is not positive or
    /// out of range
    fn try_from(jwt: &JwtConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            jwt_secret: jwt.secret.clone(),
            algorithm: Algorithm::HS256,
            access_token_ttl: lifetime_from_seconds(
                "access token expiry",
                jwt.access_token_expiry,
            )?,
            refresh_token_ttl: lifetime_from_seconds(
                "refresh token expiry",
                jwt.refresh_token_expiry,
            )?,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
        })
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            algorithm: Algorithm::HS256,
            // Built-in defaults are in range
            access_token_ttl: Duration::seconds(jwt.access_token_expiry),
            refresh_token_ttl: Duration::seconds(jwt.refresh_token_expiry),
            issuer: jwt.issuer,
            audience: jwt.audience,
        }
    }
}
