//! Unit tests for token entities

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshTokenRecord, TokenKind, TokenPair};

fn claims(kind: TokenKind, ttl: Duration) -> Claims {
    Claims::new(Uuid::new_v4(), kind, None, ttl, "warden", "warden-api")
}

#[test]
fn test_access_claims() {
    let user_id = Uuid::new_v4();
    let claims = Claims::new(
        user_id,
        TokenKind::Access,
        Some("admin".to_string()),
        Duration::hours(24),
        "warden",
        "warden-api",
    );

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.iss, "warden");
    assert_eq!(claims.aud, "warden-api");
    assert_eq!(claims.role.as_deref(), Some("admin"));
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert!(!claims.is_expired());
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
}

#[test]
fn test_token_id_only_for_refresh_claims() {
    let access = claims(TokenKind::Access, Duration::minutes(5));
    let refresh = claims(TokenKind::Refresh, Duration::days(7));

    assert_eq!(access.token_id(), None);
    assert_eq!(refresh.token_id(), Some(refresh.jti.as_str()));
}

#[test]
fn test_every_claims_gets_a_fresh_jti() {
    let a = claims(TokenKind::Refresh, Duration::days(7));
    let b = claims(TokenKind::Refresh, Duration::days(7));
    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_claims_expiration() {
    let mut claims = claims(TokenKind::Access, Duration::minutes(5));
    claims.exp = Utc::now().timestamp() - 1;
    assert!(claims.is_expired());
}

#[test]
fn test_kind_serializes_lowercase() {
    let claims = claims(TokenKind::Refresh, Duration::days(1));
    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(json["kind"], "refresh");
    assert!(json.get("role").is_none());
}

#[test]
fn test_refresh_record_time_until_expiration() {
    let record = RefreshTokenRecord::new(
        "tid".to_string(),
        Uuid::new_v4(),
        "hash".to_string(),
        None,
        Utc::now() + Duration::days(3),
    );

    let remaining = record.time_until_expiration();
    assert!(remaining <= Duration::days(3));
    assert!(remaining > Duration::days(3) - Duration::minutes(1));
    assert!(!record.is_expired());
}

#[test]
fn test_expired_record_has_zero_remaining() {
    let record = RefreshTokenRecord::new(
        "tid".to_string(),
        Uuid::new_v4(),
        "hash".to_string(),
        Some("cli".to_string()),
        Utc::now() - Duration::seconds(1),
    );
    assert!(record.is_expired());
    assert_eq!(record.time_until_expiration(), Duration::zero());
}

#[test]
fn test_token_pair_creation() {
    let pair = TokenPair::new("a".to_string(), "r".to_string(), 900, 604800);
    assert_eq!(pair.access_token, "a");
    assert_eq!(pair.refresh_token, "r");
    assert_eq!(pair.access_expires_in, 900);
    assert_eq!(pair.refresh_expires_in, 604800);
}
