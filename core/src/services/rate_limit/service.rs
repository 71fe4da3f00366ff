//! Rate limiter implementation
//!
//! Every check counts, including checks made while already blocked, so
//! `attempts` keeps growing until the window closes.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::warn;
use warden_shared::{LimitRule, RateLimitConfig};

use crate::domain::entities::rate_limit::{RateLimitStatus, RateLimitWindow};
use crate::errors::DomainError;
use crate::services::lifetime_from_seconds;
use crate::store::{ExpiringStore, Sweep};

pub struct RateLimiter {
    windows: Arc<ExpiringStore<String, RateLimitWindow>>,
    login: LimitRule,
    login_window: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Result<Self, DomainError> {
        Ok(Self {
            windows: Arc::new(ExpiringStore::new("rate_limits")),
            login: config.login,
            login_window: lifetime_from_seconds("login window", config.login.window_seconds)?,
        })
    }

    pub fn login_rule(&self) -> LimitRule {
        self.login
    }

    /// Counts one attempt for `identifier`
    ///
    /// The first attempt, and the first one after the window closed, opens a
    /// new window with `attempts = 1`.
    pub async fn check(
        &self,
        identifier: &str,
        max_attempts: u32,
        window: Duration,
    ) -> RateLimitStatus {
        self.check_at(identifier, max_attempts, window, Utc::now())
            .await
    }

    pub(crate) async fn check_at(
        &self,
        identifier: &str,
        max_attempts: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitStatus {
        let (state, reset_time) = self
            .windows
            .upsert_at(
                identifier.to_string(),
                now,
                || {
                    (
                        RateLimitWindow {
                            attempts: 1,
                            window_started_at: now,
                        },
                        now + window,
                    )
                },
                |state, _| state.attempts = state.attempts.saturating_add(1),
            )
            .await;

        let status = RateLimitStatus {
            attempts: state.attempts,
            blocked: state.attempts > max_attempts,
            reset_time,
        };
        if status.blocked && state.attempts == max_attempts.saturating_add(1) {
            warn!(identifier = %identifier, attempts = state.attempts, "Rate limit exceeded");
        }
        status
    }

    /// [`Self::check`] with the configured login rule
    pub async fn check_login(&self, identifier: &str) -> RateLimitStatus {
        self.check(identifier, self.login.max_attempts, self.login_window)
            .await
    }

    /// Current window for `identifier` against the login rule, without counting
    pub async fn status(&self, identifier: &str) -> Option<RateLimitStatus> {
        let (state, reset_time) = self
            .windows
            .get_with_expiry_at(&identifier.to_string(), Utc::now())
            .await
            .ok()?;
        Some(RateLimitStatus {
            attempts: state.attempts,
            blocked: state.attempts > self.login.max_attempts,
            reset_time,
        })
    }

    /// Clears the window for `identifier`
    pub async fn reset(&self, identifier: &str) {
        self.windows.remove(&identifier.to_string()).await;
    }

    pub async fn len(&self) -> usize {
        self.windows.len().await
    }

    pub(crate) fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
        vec![self.windows.clone()]
    }
}
