//! Store semantics specs
//!
//! Verify map-like behaviour of the key-value store.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn second_put_if_absent_is_a_duplicate() {
    let cluster = Cluster::new();
    let store = cluster.store().await;

    store.put_if_absent("k", b"v").await.unwrap();
    assert_eq!(
        store.put_if_absent("k", b"v2").await,
        Err(StoreError::DuplicateKey("k".to_string()))
    );
    assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
}

#[tokio::test]
async fn replace_of_missing_key_changes_nothing() {
    let cluster = Cluster::new();
    let store = cluster.store().await;
    store.put_if_absent("present", b"1").await.unwrap();
    let before = cluster.ensemble.paths();

    assert_eq!(
        store.replace("missing", b"v").await,
        Err(StoreError::NoSuchKey("missing".to_string()))
    );
    assert_eq!(cluster.ensemble.paths(), before);
    assert_eq!(store.get("present").await.unwrap(), Some(b"1".to_vec()));
}

#[tokio::test]
async fn remove_is_not_repeatable() {
    let cluster = Cluster::new();
    let store = cluster.store().await;
    store.put_if_absent("k", b"v").await.unwrap();

    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
    assert_eq!(
        store.remove("k").await,
        Err(StoreError::NoSuchKey("k".to_string()))
    );
}

#[tokio::test]
async fn stores_with_different_roots_are_independent() {
    let cluster = Cluster::new();
    let session = cluster.connect(r#"connect = "zk:2181""#).await;
    let left = ActiveKeyValueStore::open(session.clone(), session.path("/left").unwrap())
        .await
        .unwrap();
    let right = ActiveKeyValueStore::open(session.clone(), session.path("/right").unwrap())
        .await
        .unwrap();

    left.put_if_absent("k", b"l").await.unwrap();
    right.put_if_absent("k", b"r").await.unwrap();

    assert_eq!(left.get("k").await.unwrap(), Some(b"l".to_vec()));
    assert_eq!(right.get("k").await.unwrap(), Some(b"r".to_vec()));
    assert_eq!(left.size().await.unwrap(), 1);
}

#[tokio::test]
async fn keys_are_visible_across_sessions() {
    let cluster = Cluster::new();
    let writer = cluster.store().await;
    let reader = cluster.store().await;

    writer
        .put_all([("a", b"1".to_vec()), ("b", b"2".to_vec())])
        .await
        .unwrap();

    assert_eq!(reader.keys().await.unwrap(), vec!["a", "b"]);
    assert!(reader.contains_key("b").await.unwrap());
    assert_eq!(reader.entry_set().await.unwrap().len(), 2);
}

#[tokio::test]
async fn optimistic_update_cycle() {
    let cluster = Cluster::new();
    let store = cluster.store().await;
    store.put_if_absent("counter", b"0").await.unwrap();

    for _ in 0..5 {
        let (value, version) = store.get_versioned("counter").await.unwrap().unwrap();
        let next: u32 = String::from_utf8(value).unwrap().parse::<u32>().unwrap() + 1;
        store
            .replace_versioned("counter", next.to_string().as_bytes(), version)
            .await
            .unwrap();
    }

    assert_eq!(store.get("counter").await.unwrap(), Some(b"5".to_vec()));
    assert!(matches!(
        store.replace_versioned("counter", b"x", 0).await,
        Err(StoreError::VersionConflict { actual: 5, .. })
    ));
}
