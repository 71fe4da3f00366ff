//! Fixed-window rate limit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counter for one identifier inside the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    /// Checks made since the window opened, including blocked ones
    pub attempts: u32,

    pub window_started_at: DateTime<Utc>,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub attempts: u32,

    /// `attempts > max_attempts`
    pub blocked: bool,

    /// When the current window closes
    pub reset_time: DateTime<Utc>,
}

impl RateLimitStatus {
    /// Seconds until the window closes, never negative
    pub fn retry_after_seconds(&self) -> i64 {
        (self.reset_time - Utc::now()).num_seconds().max(0)
    }
}
