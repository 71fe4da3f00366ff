//! Unit tests for session and one-time token entities

use chrono::{Duration, Utc};
use serde_json::{json, Map};
use uuid::Uuid;

use crate::domain::entities::one_time_token::generate_token;
use crate::domain::entities::session::Session;

#[test]
fn test_touch_merges_and_slides() {
    let created = Utc::now() - Duration::hours(23);
    let mut data = Map::new();
    data.insert("theme".to_string(), json!("dark"));
    data.insert("lang".to_string(), json!("en"));

    let mut session = Session::new(
        "sid".to_string(),
        Uuid::new_v4(),
        data,
        Duration::hours(24),
        created,
    );
    assert_eq!(session.expires_at, created + Duration::hours(24));

    let now = Utc::now();
    let mut updates = Map::new();
    updates.insert("lang".to_string(), json!("fr"));
    session.touch(updates, Duration::hours(24), now);

    assert_eq!(session.data["theme"], json!("dark"));
    assert_eq!(session.data["lang"], json!("fr"));
    assert_eq!(session.last_activity, now);
    assert_eq!(session.expires_at, now + Duration::hours(24));
    assert_eq!(session.created_at, created);
}

#[test]
fn test_generated_tokens_are_hex_and_unique() {
    let a = generate_token(32);
    let b = generate_token(32);

    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}
