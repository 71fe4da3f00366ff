//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::env_parse_or;

/// A fixed-window limit: at most `max_attempts` within `window_seconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitRule {
    /// Attempts allowed inside one window before the caller is blocked
    pub max_attempts: u32,

    /// Window length in seconds
    pub window_seconds: i64,
}

impl LimitRule {
    pub fn new(max_attempts: u32, window_seconds: i64) -> Self {
        Self {
            max_attempts,
            window_seconds,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Login attempts per identifier
    #[serde(default = "default_login_rule")]
    pub login: LimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: default_login_rule(),
        }
    }
}

impl RateLimitConfig {
    /// Create rate limit config for development (more lenient)
    pub fn development() -> Self {
        Self {
            login: LimitRule::new(50, 900),
        }
    }

    /// Create rate limit config for production
    pub fn production() -> Self {
        Self::default()
    }

    /// Read overrides from `LOGIN_MAX_ATTEMPTS` / `LOGIN_WINDOW_SECONDS`
    pub fn from_env() -> Self {
        let base = default_login_rule();
        Self {
            login: LimitRule::new(
                env_parse_or("LOGIN_MAX_ATTEMPTS", base.max_attempts),
                env_parse_or("LOGIN_WINDOW_SECONDS", base.window_seconds),
            ),
        }
    }
}

fn default_login_rule() -> LimitRule {
    LimitRule::new(5, 900) // 5 attempts per 15 minutes
}
