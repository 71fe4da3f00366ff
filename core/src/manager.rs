//! The composed auth service object
//!
//! [`AuthManager`] is built once at startup from an [`AppConfig`] and shared
//! (usually behind an `Arc`) with request handlers. It owns every store and
//! the janitor task; call [`AuthManager::shutdown`] to stop the task.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use warden_shared::AppConfig;

use crate::errors::DomainError;
use crate::repositories::UserRepository;
use crate::services::audit::{ActivityTracker, SecurityEventLog};
use crate::services::janitor::{Janitor, JanitorHandle, JanitorReport};
use crate::services::one_time::{EmailVerificationService, PasswordResetService};
use crate::services::rate_limit::RateLimiter;
use crate::services::session::SessionService;
use crate::services::token::{TokenService, TokenServiceConfig};
use crate::store::Sweep;

/// Entry counts per store, including expired entries not yet swept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSizes {
    pub refresh_tokens: usize,
    pub blacklist: usize,
    pub indexed_users: usize,
    pub sessions: usize,
    pub password_resets: usize,
    pub email_verifications: usize,
    pub rate_limits: usize,
    pub activity: usize,
    pub security_events: usize,
    pub security_event_counters: usize,
}

/// Configured lifetimes, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TtlSettings {
    pub access_token: i64,
    pub refresh_token: i64,
    pub session: i64,
    pub password_reset: i64,
    pub email_verification: i64,
    pub login_window: i64,
    pub janitor_interval: u64,
}

/// Snapshot returned by [`AuthManager::status`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    pub healthy: bool,
    pub janitor_running: bool,
    pub stores: StoreSizes,
    pub ttls: TtlSettings,
}

/// Owns all credential stores and the janitor
pub struct AuthManager<U: UserRepository + 'static> {
    config: AppConfig,
    tokens: TokenService<U>,
    sessions: SessionService,
    password_resets: PasswordResetService,
    email_verifications: EmailVerificationService,
    rate_limiter: RateLimiter,
    audit: Arc<SecurityEventLog>,
    activity: Arc<ActivityTracker>,
    janitor: Arc<Janitor>,
    janitor_handle: Mutex<Option<JanitorHandle>>,
}

impl<U: UserRepository + 'static> AuthManager<U> {
    /// Builds every service and starts the janitor.
    ///
    /// The janitor is only started when called inside a Tokio runtime and
    /// enabled in configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthManager)` - Ready to serve
    /// * `Err(DomainError::Config)` - No JWT signing secret configured, or a
    ///   lifetime that is not positive or out of range
    pub fn new(config: AppConfig, users: Arc<U>) -> Result<Self, DomainError> {
        let audit = Arc::new(SecurityEventLog::new(&config.audit)?);
        let activity = Arc::new(ActivityTracker::new(&config.audit)?);

        let tokens = TokenService::new(
            TokenServiceConfig::try_from(&config.auth.jwt)?,
            users,
            audit.clone(),
            activity.clone(),
        )?;
        let sessions = SessionService::new(&config.auth.session, audit.clone(), activity.clone())?;
        let password_resets = PasswordResetService::new(&config.auth.one_time, audit.clone())?;
        let email_verifications =
            EmailVerificationService::new(&config.auth.one_time, audit.clone())?;
        let rate_limiter = RateLimiter::new(&config.rate_limit)?;

        let targets: Vec<Arc<dyn Sweep>> = tokens
            .sweep_targets()
            .into_iter()
            .chain(sessions.sweep_targets())
            .chain(password_resets.sweep_targets())
            .chain(email_verifications.sweep_targets())
            .chain(rate_limiter.sweep_targets())
            .chain(audit.sweep_targets())
            .chain(activity.sweep_targets())
            .collect();
        let janitor = Arc::new(Janitor::new(targets, config.janitor.clone()));

        let handle = if tokio::runtime::Handle::try_current().is_ok() {
            janitor.clone().start()
        } else {
            warn!("No Tokio runtime available; janitor not started");
            None
        };

        info!(
            environment = %config.environment,
            issuer = %config.auth.jwt.issuer,
            janitor = handle.is_some(),
            "Auth manager initialized"
        );

        Ok(Self {
            config,
            tokens,
            sessions,
            password_resets,
            email_verifications,
            rate_limiter,
            audit,
            activity,
            janitor,
            janitor_handle: Mutex::new(handle),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenService<U> {
        &self.tokens
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn password_resets(&self) -> &PasswordResetService {
        &self.password_resets
    }

    pub fn email_verifications(&self) -> &EmailVerificationService {
        &self.email_verifications
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn security_events(&self) -> &SecurityEventLog {
        &self.audit
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    /// True iff a signing secret is configured
    pub fn is_healthy(&self) -> bool {
        self.config.auth.jwt.has_secret()
    }

    /// Run a janitor pass immediately, independent of the background task
    pub async fn sweep_now(&self) -> JanitorReport {
        self.janitor.run_once(Utc::now()).await
    }

    pub async fn status(&self) -> AuthStatus {
        let token_sizes = self.tokens.sizes().await;
        let stores = StoreSizes {
            refresh_tokens: token_sizes.refresh_tokens,
            blacklist: token_sizes.blacklist,
            indexed_users: token_sizes.indexed_users,
            sessions: self.sessions.len().await,
            password_resets: self.password_resets.len().await,
            email_verifications: self.email_verifications.len().await,
            rate_limits: self.rate_limiter.len().await,
            activity: self.activity.len().await,
            security_events: self.audit.len().await,
            security_event_counters: self.audit.counter_len().await,
        };

        let token_config = self.tokens.config();
        let ttls = TtlSettings {
            access_token: token_config.access_token_ttl.num_seconds(),
            refresh_token: token_config.refresh_token_ttl.num_seconds(),
            session: self.sessions.ttl().num_seconds(),
            password_reset: self.password_resets.ttl().num_seconds(),
            email_verification: self.email_verifications.ttl().num_seconds(),
            login_window: self.rate_limiter.login_rule().window_seconds,
            janitor_interval: self.janitor.config().interval_seconds,
        };

        let janitor_running = self
            .janitor_handle
            .lock()
            .await
            .as_ref()
            .map_or(false, |handle| !handle.is_finished());

        AuthStatus {
            healthy: self.is_healthy(),
            janitor_running,
            stores,
            ttls,
        }
    }

    /// Stops the janitor and waits for it. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let handle = self.janitor_handle.lock().await.take();
        if let Some(handle) = handle {
            handle.shutdown().await;
            info!("Auth manager shut down");
        }
    }
}
