//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing, sessions and one-time tokens
//! - `environment` - Environment detection and logging configuration
//! - `maintenance` - Janitor schedule and audit retention
//! - `rate_limit` - Fixed-window limits for login attempts

pub mod auth;
pub mod environment;
pub mod maintenance;
pub mod rate_limit;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, OneTimeTokenConfig, SessionConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use maintenance::{AuditConfig, JanitorConfig};
pub use rate_limit::{LimitRule, RateLimitConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Audit retention configuration
    #[serde(default)]
    pub audit: AuditConfig,

    /// Janitor configuration
    #[serde(default)]
    pub janitor: JanitorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build a configuration around an explicit signing secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.auth.jwt.secret = secret.into();
        config
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let rate_limit = match environment {
            Environment::Development => RateLimitConfig::development(),
            _ => RateLimitConfig::from_env(),
        };

        Self {
            environment,
            auth: AuthConfig::from_env(),
            rate_limit,
            audit: AuditConfig::default(),
            janitor: JanitorConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Load a `.env` file (if present) and then read the environment
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_secret() {
        let config = AppConfig::with_secret("abc");
        assert!(config.auth.jwt.has_secret());
        assert_eq!(config.janitor.interval_seconds, 300);
    }

    #[test]
    fn test_env_parse_or_falls_back_on_garbage() {
        env::set_var("WARDEN_TEST_PARSE_GARBAGE", "not-a-number");
        assert_eq!(env_parse_or("WARDEN_TEST_PARSE_GARBAGE", 42i64), 42);
        env::remove_var("WARDEN_TEST_PARSE_GARBAGE");
    }
}
