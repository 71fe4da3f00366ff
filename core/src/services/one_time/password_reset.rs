//! Password reset tokens: verify any number of times, then consume once

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use warden_shared::OneTimeTokenConfig;

use crate::domain::entities::one_time_token::{
    generate_token, IssuedToken, OneTimePurpose, OneTimeToken,
};
use crate::domain::entities::security_event::SecurityEventType;
use crate::errors::{DomainError, TokenError};
use crate::services::audit::SecurityEventLog;
use crate::services::lifetime_from_seconds;
use crate::store::{ExpiringStore, Lookup, Sweep, Take};

use super::take_error;

pub struct PasswordResetService {
    tokens: Arc<ExpiringStore<String, OneTimeToken>>,
    ttl: Duration,
    token_bytes: usize,
    audit: Arc<SecurityEventLog>,
}

impl PasswordResetService {
    pub fn new(
        config: &OneTimeTokenConfig,
        audit: Arc<SecurityEventLog>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            tokens: Arc::new(ExpiringStore::new("password_resets")),
            ttl: lifetime_from_seconds(
                "password reset ttl",
                config.password_reset_ttl_seconds,
            )?,
            token_bytes: config.token_bytes,
            audit,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a reset token for `user_id`
    pub async fn issue(&self, user_id: Uuid) -> IssuedToken {
        let now = Utc::now();
        let token = generate_token(self.token_bytes);
        let record = OneTimeToken {
            purpose: OneTimePurpose::PasswordReset,
            user_id,
            email: None,
            created_at: now,
            expires_at: now + self.ttl,
        };
        let expires_at = record.expires_at;

        self.tokens.put(token.clone(), record, expires_at).await;
        self.audit
            .record(user_id, SecurityEventType::PasswordResetRequested, json!({}))
            .await;
        info!(user_id = %user_id, "Password reset token issued");

        IssuedToken { token, expires_at }
    }

    /// Checks a reset token without using it up
    ///
    /// # Returns
    ///
    /// * `Ok(OneTimeToken)` - Token payload
    /// * `Err(TokenError::TokenExpired)` - Token expired (it is now deleted)
    /// * `Err(TokenError::TokenNotFound)` - Unknown or already consumed
    pub async fn verify(&self, token: &str) -> Result<OneTimeToken, DomainError> {
        self.verify_at(token, Utc::now()).await
    }

    pub(crate) async fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<OneTimeToken, DomainError> {
        match self.tokens.lookup_at(&token.to_string(), now).await {
            Lookup::Live(record) => Ok(record),
            Lookup::Expired => Err(TokenError::TokenExpired.into()),
            Lookup::Missing => Err(TokenError::TokenNotFound.into()),
        }
    }

    /// Verifies and deletes the token in one step
    pub async fn consume(&self, token: &str) -> Result<OneTimeToken, DomainError> {
        match self
            .tokens
            .take_if_at(&token.to_string(), Utc::now(), |_| true)
            .await
        {
            Take::Taken(record) => {
                self.audit
                    .record(
                        record.user_id,
                        SecurityEventType::PasswordResetCompleted,
                        json!({}),
                    )
                    .await;
                info!(user_id = %record.user_id, "Password reset token consumed");
                Ok(record)
            }
            other => Err(take_error(&other)),
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.len().await
    }

    pub(crate) fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
        vec![self.tokens.clone()]
    }
}
