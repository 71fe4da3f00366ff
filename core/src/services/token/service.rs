//! Token lifecycle: issue, persist, refresh with rotation, revoke

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::security_event::SecurityEventType;
use crate::domain::entities::token::{
    BlacklistEntry, Claims, RefreshTokenRecord, RevocationReason, TokenKind, TokenPair,
};
use crate::domain::entities::user::UserRecord;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::UserRepository;
use crate::services::audit::{ActivityTracker, SecurityEventLog};
use crate::store::{ExpiringStore, Sweep, Take};

use super::config::TokenServiceConfig;
use super::index::UserTokenIndex;
use super::signer::SigningEngine;

/// Result of a successful refresh
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// The rotated pair; the presented refresh token is now revoked
    pub tokens: TokenPair,
    /// The user record after the last-login touch
    pub user: UserRecord,
}

/// Store sizes reported through the manager's status query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStoreSizes {
    pub refresh_tokens: usize,
    pub blacklist: usize,
    pub indexed_users: usize,
}

/// Service for managing the lifecycle of access and refresh tokens
pub struct TokenService<U: UserRepository> {
    signer: SigningEngine,
    config: TokenServiceConfig,
    refresh_tokens: Arc<ExpiringStore<String, RefreshTokenRecord>>,
    blacklist: Arc<ExpiringStore<String, BlacklistEntry>>,
    index: Arc<UserTokenIndex>,
    users: Arc<U>,
    audit: Arc<SecurityEventLog>,
    activity: Arc<ActivityTracker>,
}

impl<U: UserRepository> TokenService<U> {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// * `Ok(TokenService)` - Service ready to issue tokens
    /// * `Err(DomainError::Config)` - No signing secret configured
    pub fn new(
        config: TokenServiceConfig,
        users: Arc<U>,
        audit: Arc<SecurityEventLog>,
        activity: Arc<ActivityTracker>,
    ) -> Result<Self, DomainError> {
        let signer = SigningEngine::new(&config)?;

        Ok(Self {
            signer,
            config,
            refresh_tokens: Arc::new(ExpiringStore::new("refresh_tokens")),
            blacklist: Arc::new(ExpiringStore::new("blacklist")),
            index: Arc::new(UserTokenIndex::new()),
            users,
            audit,
            activity,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn signer(&self) -> &SigningEngine {
        &self.signer
    }

    /// Signs a new access/refresh pair for a user.
    ///
    /// Nothing is stored; call [`Self::persist_refresh_token`] to make the
    /// refresh token usable.
    pub fn issue_token_pair(
        &self,
        user_id: Uuid,
        role: Option<String>,
    ) -> Result<TokenPair, DomainError> {
        let (access_token, _) =
            self.signer
                .issue(user_id, TokenKind::Access, role, self.config.access_token_ttl)?;
        let (refresh_token, _) =
            self.signer
                .issue(user_id, TokenKind::Refresh, None, self.config.refresh_token_ttl)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_ttl.num_seconds(),
            self.config.refresh_token_ttl.num_seconds(),
        ))
    }

    /// Stores the server-side record for a refresh token and indexes it
    /// under its owner.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The token ID
    /// * `Err(TokenError::TokenMismatch)` - Token subject is not `user_id`
    /// * `Err(TokenError::TokenRevoked)` - Token ID is already blacklisted
    /// * Any error of [`SigningEngine::verify`]
    pub async fn persist_refresh_token(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        device_info: Option<String>,
    ) -> Result<String, DomainError> {
        let claims = self.signer.verify(refresh_token, TokenKind::Refresh)?;
        if claims.user_id().ok() != Some(user_id) {
            return Err(TokenError::TokenMismatch.into());
        }
        let token_id = claims
            .token_id()
            .ok_or(TokenError::InvalidTokenFormat)?
            .to_string();
        let expires_at = claims.expires_at().ok_or(TokenError::InvalidTokenFormat)?;

        if self.blacklist.contains_at(&token_id, Utc::now()).await {
            return Err(TokenError::TokenRevoked.into());
        }

        let record = RefreshTokenRecord::new(
            token_id.clone(),
            user_id,
            hash_token(refresh_token),
            device_info,
            expires_at,
        );

        // Record first, index second: an indexed ID always had a record
        self.refresh_tokens
            .put(token_id.clone(), record, expires_at)
            .await;
        self.index.add(user_id, &token_id).await;

        debug!(user_id = %user_id, token_id = %token_id, "Refresh token persisted");
        Ok(token_id)
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.signer.verify(token, TokenKind::Access)
    }

    /// Verifies a refresh token, including the blacklist check
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError::TokenRevoked)` - Token ID is blacklisted
    /// * Any error of [`SigningEngine::verify`]
    pub async fn verify_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.signer.verify(token, TokenKind::Refresh)?;
        let token_id = claims.token_id().ok_or(TokenError::InvalidTokenFormat)?;

        if let Some(entry) = self.blacklist.get(&token_id.to_string()).await {
            warn!(
                sub = %claims.sub,
                token_id = %token_id,
                reason = ?entry.reason,
                "Revoked refresh token presented"
            );
            if let Ok(user_id) = claims.user_id() {
                self.audit
                    .record(
                        user_id,
                        SecurityEventType::RefreshReplayDetected,
                        json!({ "token_id": token_id, "reason": entry.reason }),
                    )
                    .await;
            }
            return Err(TokenError::TokenRevoked.into());
        }

        Ok(claims)
    }

    /// Exchanges a refresh token for a new pair (rotation).
    ///
    /// The stored record is removed atomically, so of two concurrent calls
    /// with the same token exactly one succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshOutcome)` - New pair and the refreshed user record
    /// * `Err(AuthError::UserInactive)` - User missing or deactivated
    /// * `Err(TokenError::TokenNotFound)` - No record for the token ID
    /// * `Err(TokenError::TokenExpired)` - Record past its expiry
    /// * `Err(TokenError::TokenMismatch)` - Stored token differs from the presented one
    /// * Any error of [`Self::verify_refresh_token`]
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, DomainError> {
        let claims = self.verify_refresh_token(refresh_token).await?;
        let user_id = claims.user_id().map_err(|_| TokenError::InvalidTokenFormat)?;
        let token_id = claims
            .token_id()
            .ok_or(TokenError::InvalidTokenFormat)?
            .to_string();

        let user = match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                debug!(user_id = %user_id, "Refresh rejected: user missing or inactive");
                return Err(AuthError::UserInactive.into());
            }
        };

        let new_pair = self.issue_token_pair(user_id, user.role.clone())?;

        let presented_hash = hash_token(refresh_token);
        let old = match self
            .refresh_tokens
            .take_if_at(&token_id, Utc::now(), |record| {
                constant_time_eq(record.token_hash.as_bytes(), presented_hash.as_bytes())
            })
            .await
        {
            Take::Taken(record) => record,
            Take::Rejected => {
                warn!(user_id = %user_id, token_id = %token_id, "Refresh token does not match stored record");
                return Err(TokenError::TokenMismatch.into());
            }
            Take::Expired => {
                self.index.remove(user_id, &token_id).await;
                return Err(TokenError::TokenExpired.into());
            }
            Take::Missing => return Err(TokenError::TokenNotFound.into()),
        };

        let new_token_id = self
            .persist_refresh_token(user_id, &new_pair.refresh_token, old.device_info.clone())
            .await?;

        let expires_at = claims.expires_at().unwrap_or(old.expires_at);
        self.blacklist
            .put(
                token_id.clone(),
                BlacklistEntry::new(RevocationReason::Rotated),
                blacklist_until(expires_at),
            )
            .await;
        self.index.remove(user_id, &token_id).await;

        if let Err(e) = self.users.touch_last_login(user_id).await {
            warn!(user_id = %user_id, error = %e, "Failed to update last login");
        }
        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(updated)) => updated,
            _ => user,
        };

        self.audit
            .record(
                user_id,
                SecurityEventType::TokenRefreshed,
                json!({ "old_token_id": token_id, "new_token_id": new_token_id }),
            )
            .await;
        self.activity.record_activity(user_id, "token_refresh").await;

        info!(user_id = %user_id, old_token_id = %token_id, new_token_id = %new_token_id, "Refresh token rotated");

        Ok(RefreshOutcome {
            tokens: new_pair,
            user,
        })
    }

    /// Makes a refresh token unusable.
    ///
    /// Tokens that do not decode, or carry no token ID, are ignored. Expiry
    /// is not enforced so an expired-but-stored token can still be cleaned up.
    pub async fn revoke_one(&self, refresh_token: &str) {
        let Ok(claims) = self.signer.decode_ignoring_expiry(refresh_token) else {
            debug!("Revocation ignored: token does not decode");
            return;
        };
        let Some(token_id) = claims.token_id().map(str::to_string) else {
            debug!("Revocation ignored: token carries no token ID");
            return;
        };

        let owner = match self.refresh_tokens.remove(&token_id).await {
            Some(record) => Some(record.user_id),
            None => claims.user_id().ok(),
        };
        if let Some(user_id) = owner {
            self.index.remove(user_id, &token_id).await;
        }

        let now = Utc::now();
        if let Some(until) = claims
            .expires_at()
            .map(blacklist_until)
            .filter(|until| *until > now)
        {
            self.blacklist
                .put(
                    token_id.clone(),
                    BlacklistEntry::new(RevocationReason::Revoked),
                    until,
                )
                .await;
        }

        if let Some(user_id) = owner {
            self.audit
                .record(
                    user_id,
                    SecurityEventType::TokenRevoked,
                    json!({ "token_id": token_id }),
                )
                .await;
        }
        info!(token_id = %token_id, "Refresh token revoked");
    }

    /// Revokes every indexed refresh token of a user; returns how many.
    ///
    /// Works on a snapshot of the index taken in one step. A token persisted
    /// while this runs lands in a fresh index entry and survives.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> usize {
        let token_ids = self.index.take_all(user_id).await;
        if token_ids.is_empty() {
            return 0;
        }

        let now = Utc::now();
        let mut revoked = 0;
        for token_id in &token_ids {
            let Some(record) = self.refresh_tokens.remove(token_id).await else {
                continue;
            };
            let until = blacklist_until(record.expires_at);
            if until > now {
                self.blacklist
                    .put(
                        token_id.clone(),
                        BlacklistEntry::new(RevocationReason::RevokedAll),
                        until,
                    )
                    .await;
            }
            revoked += 1;
        }

        self.audit
            .record(
                user_id,
                SecurityEventType::AllTokensRevoked,
                json!({ "count": revoked }),
            )
            .await;
        info!(user_id = %user_id, count = revoked, "All refresh tokens revoked for user");

        revoked
    }

    /// Size of the user's live token set
    pub async fn active_token_count(&self, user_id: Uuid) -> usize {
        self.index.count(user_id).await
    }

    /// Stored record for a live refresh token ID
    pub async fn find_record(&self, token_id: &str) -> Option<RefreshTokenRecord> {
        self.refresh_tokens.get(&token_id.to_string()).await
    }

    /// Whether the token ID is blacklisted at `now`
    pub async fn is_blacklisted_at(&self, token_id: &str, now: DateTime<Utc>) -> bool {
        self.blacklist.contains_at(&token_id.to_string(), now).await
    }

    /// Blacklist expiry for a token ID, if it is blacklisted at `now`
    pub async fn blacklist_expiry_at(
        &self,
        token_id: &str,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.blacklist
            .get_with_expiry_at(&token_id.to_string(), now)
            .await
            .ok()
            .map(|(_, expires_at)| expires_at)
    }

    pub async fn sizes(&self) -> TokenStoreSizes {
        TokenStoreSizes {
            refresh_tokens: self.refresh_tokens.len().await,
            blacklist: self.blacklist.len().await,
            indexed_users: self.index.users().await,
        }
    }

    /// Stores swept by the janitor; the index pruner comes last so it sees
    /// records already removed by the same pass
    pub(crate) fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
        vec![
            self.refresh_tokens.clone(),
            self.blacklist.clone(),
            Arc::new(IndexPruner {
                index: self.index.clone(),
                records: self.refresh_tokens.clone(),
            }),
        ]
    }
}

/// Drops index entries whose refresh record is gone
struct IndexPruner {
    index: Arc<UserTokenIndex>,
    records: Arc<ExpiringStore<String, RefreshTokenRecord>>,
}

#[async_trait]
impl Sweep for IndexPruner {
    fn name(&self) -> &'static str {
        "user_token_index"
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut pruned = 0;
        for (user_id, token_id) in self.index.snapshot().await {
            // IDs are never reused, so a missing record cannot come back
            if !self.records.contains_at(&token_id, now).await
                && self.index.remove(user_id, &token_id).await
            {
                pruned += 1;
            }
        }
        pruned
    }

    async fn len(&self) -> usize {
        self.index.users().await
    }
}

/// Blacklist expiry for a token that expires at `exp`.
///
/// `exp` has whole-second precision and the signature check accepts the token
/// for the whole of that second, so the entry outlives it by one second.
pub(crate) fn blacklist_until(exp: DateTime<Utc>) -> DateTime<Utc> {
    exp.checked_add_signed(Duration::seconds(1)).unwrap_or(exp)
}

/// SHA-256 of the raw token, hex encoded
pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
