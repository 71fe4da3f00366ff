//! Janitor and audit retention configuration

use serde::{Deserialize, Serialize};

use super::env_parse_or;

/// Configuration for the periodic expiry sweep
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JanitorConfig {
    /// How often to run a sweep (in seconds)
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,

    /// Whether the background sweep is started at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            enabled: default_enabled(),
        }
    }
}

impl JanitorConfig {
    pub fn from_env() -> Self {
        Self {
            interval_seconds: env_parse_or("JANITOR_INTERVAL_SECONDS", default_interval()),
            enabled: env_parse_or("JANITOR_ENABLED", default_enabled()),
        }
    }
}

/// Retention windows for security events and activity records
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// How long individual security events are kept
    #[serde(default = "default_event_retention")]
    pub event_retention_seconds: i64,

    /// Rolling window for per-user event counters
    #[serde(default = "default_counter_window")]
    pub counter_window_seconds: i64,

    /// How long the last-activity record for a user is kept
    #[serde(default = "default_activity_retention")]
    pub activity_retention_seconds: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            event_retention_seconds: default_event_retention(),
            counter_window_seconds: default_counter_window(),
            activity_retention_seconds: default_activity_retention(),
        }
    }
}

fn default_interval() -> u64 {
    300 // 5 minutes
}

fn default_enabled() -> bool {
    true
}

fn default_event_retention() -> i64 {
    30 * 86400
}

fn default_counter_window() -> i64 {
    86400
}

fn default_activity_retention() -> i64 {
    7 * 86400
}
