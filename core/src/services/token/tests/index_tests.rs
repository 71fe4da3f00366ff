//! Unit tests for the per-user token index

use uuid::Uuid;

use crate::services::token::UserTokenIndex;

#[tokio::test]
async fn test_add_remove_prunes_empty_sets() {
    let index = UserTokenIndex::new();
    let user = Uuid::new_v4();

    index.add(user, "a").await;
    index.add(user, "b").await;
    index.add(user, "a").await;
    assert_eq!(index.count(user).await, 2);
    assert_eq!(index.users().await, 1);

    assert!(index.remove(user, "a").await);
    assert!(!index.remove(user, "a").await);
    assert!(index.remove(user, "b").await);

    assert_eq!(index.count(user).await, 0);
    assert_eq!(index.users().await, 0);
}

#[tokio::test]
async fn test_take_all_detaches_set() {
    let index = UserTokenIndex::new();
    let user = Uuid::new_v4();
    index.add(user, "a").await;
    index.add(user, "b").await;

    let taken = index.take_all(user).await;
    assert_eq!(taken.len(), 2);
    assert_eq!(index.count(user).await, 0);

    // Added after the snapshot: kept in a fresh set
    index.add(user, "c").await;
    assert_eq!(index.count(user).await, 1);
    assert!(index.take_all(Uuid::new_v4()).await.is_empty());
}

#[tokio::test]
async fn test_snapshot_lists_every_pair() {
    let index = UserTokenIndex::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    index.add(alice, "a1").await;
    index.add(alice, "a2").await;
    index.add(bob, "b1").await;

    let mut pairs = index.snapshot().await;
    pairs.sort_by(|x, y| x.1.cmp(&y.1));

    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0], (alice, "a1".to_string()));
    assert_eq!(pairs[2], (bob, "b1".to_string()));
}
