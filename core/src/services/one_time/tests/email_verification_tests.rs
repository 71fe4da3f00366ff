//! Unit tests for email verification tokens

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;
use warden_shared::{AuditConfig, OneTimeTokenConfig};

use crate::domain::entities::{OneTimePurpose, SecurityEventType};
use crate::errors::{DomainError, ErrorKind, TokenError};
use crate::services::audit::SecurityEventLog;
use crate::services::one_time::EmailVerificationService;

fn service() -> (EmailVerificationService, Arc<SecurityEventLog>) {
    let audit = Arc::new(SecurityEventLog::new(&AuditConfig::default()).unwrap());
    (
        EmailVerificationService::new(&OneTimeTokenConfig::default(), audit.clone()).unwrap(),
        audit,
    )
}

#[tokio::test]
async fn test_verify_is_single_use() {
    let (verifications, audit) = service();
    let user = Uuid::new_v4();
    let issued = verifications.issue(user, "a@example.com").await;
    assert!(issued.expires_at - Utc::now() > Duration::hours(23));

    let record = verifications.verify(&issued.token).await.unwrap();
    assert_eq!(record.purpose, OneTimePurpose::EmailVerification);
    assert_eq!(record.email.as_deref(), Some("a@example.com"));

    let err = verifications.verify(&issued.token).await.unwrap_err();
    assert_eq!(err, DomainError::Token(TokenError::TokenNotFound));
    assert_eq!(audit.count(user, SecurityEventType::EmailVerified).await, 1);
}

#[tokio::test]
async fn test_expired_and_unknown() {
    let (verifications, _) = service();
    let issued = verifications.issue(Uuid::new_v4(), "b@example.com").await;

    let later = Utc::now() + Duration::hours(25);
    let err = verifications
        .verify_at(&issued.token, later)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);
    assert_eq!(verifications.len().await, 0);

    let err = verifications.verify("deadbeef").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_concurrent_verify_has_one_winner() {
    let (verifications, _) = service();
    let verifications = Arc::new(verifications);
    let issued = verifications.issue(Uuid::new_v4(), "c@example.com").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let verifications = verifications.clone();
        let token = issued.token.clone();
        handles.push(tokio::spawn(async move {
            verifications.verify(&token).await.is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}
