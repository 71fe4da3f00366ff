//! Email verification tokens: a single verify both checks and deletes

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
use crate::errors::DomainError;
use crate::services::audit::SecurityEventLog;
use crate::services::lifetime_from_seconds;
use crate::store::{ExpiringStore, Sweep, Take};

use super::take_error;

pub struct EmailVerificationService {
    tokens: Arc<ExpiringStore<String, OneTimeToken>>,
    ttl: Duration,
    token_bytes: usize,
    audit: Arc<SecurityEventLog>,
}

impl EmailVerificationService {
    pub fn new(
        config: &OneTimeTokenConfig,
        audit: Arc<SecurityEventLog>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            tokens: Arc::new(ExpiringStore::new("email_verifications")),
            ttl: lifetime_from_seconds(
                "email verification ttl",
                config.email_verification_ttl_seconds,
            )?,
            token_bytes: config.token_bytes,
            audit,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a verification token for `email` on behalf of `user_id`
    pub async fn issue(&self, user_id: Uuid, email: impl Into<String>) -> IssuedToken {
        let now = Utc::now();
        let token = generate_token(self.token_bytes);
        let record = OneTimeToken {
            purpose: OneTimePurpose::EmailVerification,
            user_id,
            email: Some(email.into()),
            created_at: now,
            expires_at: now + self.ttl,
        };
        let expires_at = record.expires_at;

        self.tokens.put(token.clone(), record, expires_at).await;
        self.audit
            .record(
                user_id,
                SecurityEventType::EmailVerificationRequested,
                json!({}),
            )
            .await;
        info!(user_id = %user_id, "Email verification token issued");

        IssuedToken { token, expires_at }
    }

    /// Validates and deletes the token
    ///
    /// # Returns
    ///
    /// * `Ok(OneTimeToken)` - Payload including the verified address
    /// * `Err(TokenError::TokenExpired)` - Token expired
    /// * `Err(TokenError::TokenNotFound)` - Unknown or already used
    pub async fn verify(&self, token: &str) -> Result<OneTimeToken, DomainError> {
        self.verify_at(token, Utc::now()).await
    }

    pub(crate) async fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<OneTimeToken, DomainError> {
        match self.tokens.take_if_at(&token.to_string(), now, |_| true).await {
            Take::Taken(record) => {
                self.audit
                    .record(record.user_id, SecurityEventType::EmailVerified, json!({}))
                    .await;
                info!(user_id = %record.user_id, "Email verified");
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
