//! Integration tests for sessions, one-time tokens, rate limiting and status

use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use warden_core::{AuthManager, ErrorKind, InMemoryUserRepository};
use warden_shared::AppConfig;

fn manager() -> AuthManager<InMemoryUserRepository> {
    AuthManager::new(
        AppConfig::with_secret("integration_test_secret_0123456789"),
        Arc::new(InMemoryUserRepository::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_session_lifecycle() {
    let manager = manager();
    let user = Uuid::new_v4();

    let extra = json!({ "device": "web" }).as_object().cloned();
    let id = manager.sessions().create(user, extra).await;

    let before = Utc::now();
    let touched = manager
        .sessions()
        .touch(&id, json!({ "page": "settings" }).as_object().cloned())
        .await
        .unwrap();
    assert!(touched.expires_at >= before + Duration::hours(24));
    assert_eq!(touched.data["device"], "web");
    assert_eq!(touched.data["page"], "settings");

    manager.sessions().destroy(&id).await;
    assert!(manager.sessions().get(&id).await.is_none());
    let err = manager.sessions().touch(&id, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(
        manager.activity().last_activity(user).await.unwrap().action,
        "session_create"
    );
    manager.shutdown().await;
}

#[tokio::test]
async fn test_one_time_tokens() {
    let manager = manager();
    let user = Uuid::new_v4();

    let reset = manager.password_resets().issue(user).await;
    assert!(manager.password_resets().verify(&reset.token).await.is_ok());
    assert!(manager.password_resets().verify(&reset.token).await.is_ok());
    manager.password_resets().consume(&reset.token).await.unwrap();
    for err in [
        manager.password_resets().verify(&reset.token).await.unwrap_err(),
        manager.password_resets().consume(&reset.token).await.unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    let verification = manager
        .email_verifications()
        .issue(user, "user@example.com")
        .await;
    // A reset token is not valid as a verification token, and vice versa
    assert!(manager
        .password_resets()
        .verify(&verification.token)
        .await
        .is_err());
    assert!(manager
        .email_verifications()
        .verify(&verification.token)
        .await
        .is_ok());
    assert!(manager
        .email_verifications()
        .verify(&verification.token)
        .await
        .is_err());

    manager.shutdown().await;
}

#[tokio::test]
async fn test_rate_limiter_window() {
    let manager = manager();
    let window = Duration::minutes(15);

    for attempt in 1..=5 {
        let status = manager.rate_limiter().check("login:alice", 5, window).await;
        assert_eq!(status.attempts, attempt);
        assert!(!status.blocked);
    }
    assert!(manager.rate_limiter().check("login:alice", 5, window).await.blocked);

    manager.rate_limiter().reset("login:alice").await;
    assert_eq!(
        manager.rate_limiter().check("login:alice", 5, window).await.attempts,
        1
    );
    manager.shutdown().await;
}

#[tokio::test]
async fn test_status_and_health() {
    let manager = manager();
    let user = Uuid::new_v4();
    manager.sessions().create(user, None).await;
    manager.password_resets().issue(user).await;
    manager.rate_limiter().check_login("bob").await;

    assert!(manager.is_healthy());
    let status = manager.status().await;
    assert!(status.healthy);
    assert!(status.janitor_running);
    assert_eq!(status.stores.sessions, 1);
    assert_eq!(status.stores.password_resets, 1);
    assert_eq!(status.stores.rate_limits, 1);
    // One event and one counter each for session creation and reset request
    assert_eq!(status.stores.security_events, 2);
    assert_eq!(status.stores.security_event_counters, 2);
    assert_eq!(status.ttls.access_token, 86400);
    assert_eq!(status.ttls.refresh_token, 604800);
    assert_eq!(status.ttls.session, 86400);
    assert_eq!(status.ttls.password_reset, 1800);
    assert_eq!(status.ttls.email_verification, 86400);
    assert_eq!(status.ttls.janitor_interval, 300);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["stores"]["sessions"], 1);
    assert_eq!(json["stores"]["security_event_counters"], 2);

    manager.shutdown().await;
    manager.shutdown().await;
    assert!(!manager.status().await.janitor_running);
}

#[tokio::test]
async fn test_sweep_now_reports_removals() {
    let manager = manager();
    assert_eq!(manager.sweep_now().await.total(), 0);
    manager.shutdown().await;
}
