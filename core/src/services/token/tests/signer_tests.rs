//! Unit tests for the signing engine

use chrono::Duration;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, ErrorKind, TokenError};
use crate::services::token::{SigningEngine, TokenServiceConfig};

const SECRET: &str = "test_secret_key_for_signing_engine";

fn engine() -> SigningEngine {
    SigningEngine::new(&TokenServiceConfig::with_secret(SECRET)).unwrap()
}

#[test]
fn test_missing_secret_is_config_error() {
    let err = SigningEngine::new(&TokenServiceConfig::with_secret("   ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = SigningEngine::new(&TokenServiceConfig::default()).unwrap_err();
    assert!(matches!(err, DomainError::Config { .. }));
}

#[test]
fn test_issue_and_verify_round_trip() {
    let engine = engine();
    let user_id = Uuid::new_v4();

    let (token, issued) = engine
        .issue(user_id, TokenKind::Access, Some("admin".to_string()), Duration::minutes(15))
        .unwrap();
    let claims = engine.verify(&token, TokenKind::Access).unwrap();

    assert_eq!(claims, issued);
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.role.as_deref(), Some("admin"));
    assert_eq!(claims.iss, engine.issuer());
    assert_eq!(claims.aud, engine.audience());
    assert!(claims.token_id().is_none());
}

#[test]
fn test_refresh_tokens_carry_unique_token_ids() {
    let engine = engine();
    let user_id = Uuid::new_v4();

    let (_, a) = engine
        .issue(user_id, TokenKind::Refresh, None, Duration::days(7))
        .unwrap();
    let (_, b) = engine
        .issue(user_id, TokenKind::Refresh, None, Duration::days(7))
        .unwrap();

    assert!(a.token_id().is_some());
    assert_ne!(a.token_id(), b.token_id());
}

#[test]
fn test_expired_token() {
    let engine = engine();
    let (token, _) = engine
        .issue(Uuid::new_v4(), TokenKind::Access, None, Duration::seconds(-10))
        .unwrap();

    let err = engine.verify(&token, TokenKind::Access).unwrap_err();
    assert_eq!(err, DomainError::Token(TokenError::TokenExpired));

    // Revocation path still reads it
    assert!(engine.decode_ignoring_expiry(&token).is_ok());
}

#[test]
fn test_kind_mismatch() {
    let engine = engine();
    let (token, _) = engine
        .issue(Uuid::new_v4(), TokenKind::Refresh, None, Duration::days(1))
        .unwrap();

    let err = engine.verify(&token, TokenKind::Access).unwrap_err();
    assert_eq!(
        err,
        DomainError::Token(TokenError::KindMismatch {
            expected: TokenKind::Access,
            actual: TokenKind::Refresh,
        })
    );
}

#[test]
fn test_malformed_and_foreign_tokens() {
    let engine = engine();

    let err = engine.verify("not.a.jwt", TokenKind::Access).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);

    let other = SigningEngine::new(&TokenServiceConfig::with_secret("a_different_secret")).unwrap();
    let (token, _) = other
        .issue(Uuid::new_v4(), TokenKind::Access, None, Duration::minutes(5))
        .unwrap();
    let err = engine.verify(&token, TokenKind::Access).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn test_wrong_audience_rejected() {
    let engine = engine();
    let claims = Claims::new(
        Uuid::new_v4(),
        TokenKind::Access,
        None,
        Duration::minutes(5),
        engine.issuer(),
        "someone-else",
    );
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let err = engine.verify(&token, TokenKind::Access).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}
