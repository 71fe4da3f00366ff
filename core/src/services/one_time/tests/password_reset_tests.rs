//! Unit tests for password reset tokens

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;
use warden_shared::{AuditConfig, OneTimeTokenConfig};

use crate::domain::entities::{OneTimePurpose, SecurityEventType};
use crate::errors::{DomainError, ErrorKind, TokenError};
use crate::services::audit::SecurityEventLog;
use crate::services::one_time::PasswordResetService;

fn service() -> (PasswordResetService, Arc<SecurityEventLog>) {
    let audit = Arc::new(SecurityEventLog::new(&AuditConfig::default()).unwrap());
    (
        PasswordResetService::new(&OneTimeTokenConfig::default(), audit.clone()).unwrap(),
        audit,
    )
}

#[tokio::test]
async fn test_issue() {
    let (resets, audit) = service();
    let user = Uuid::new_v4();

    let issued = resets.issue(user).await;
    assert_eq!(issued.token.len(), 64);
    let ttl = issued.expires_at - Utc::now();
    assert!(ttl <= Duration::minutes(30) && ttl > Duration::minutes(29));
    assert_eq!(
        audit
            .count(user, SecurityEventType::PasswordResetRequested)
            .await,
        1
    );

    let other = resets.issue(user).await;
    assert_ne!(issued.token, other.token);
}

#[tokio::test]
async fn test_verify_repeatedly_then_consume_once() {
    let (resets, audit) = service();
    let user = Uuid::new_v4();
    let issued = resets.issue(user).await;

    for _ in 0..3 {
        let record = resets.verify(&issued.token).await.unwrap();
        assert_eq!(record.user_id, user);
        assert_eq!(record.purpose, OneTimePurpose::PasswordReset);
    }

    let record = resets.consume(&issued.token).await.unwrap();
    assert_eq!(record.user_id, user);

    let err = resets.verify(&issued.token).await.unwrap_err();
    assert_eq!(err, DomainError::Token(TokenError::TokenNotFound));
    let err = resets.consume(&issued.token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(
        audit
            .count(user, SecurityEventType::PasswordResetCompleted)
            .await,
        1
    );
}

#[tokio::test]
async fn test_expired_token() {
    let (resets, _) = service();
    let issued = resets.issue(Uuid::new_v4()).await;

    let later = Utc::now() + Duration::minutes(31);
    let err = resets.verify_at(&issued.token, later).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);

    // Deleted by the expired read
    assert_eq!(resets.len().await, 0);
    let err = resets.verify(&issued.token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
