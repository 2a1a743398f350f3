//! Store concurrency specs
//!
//! Verify that concurrent callers share one store without extra locking.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_puts_have_exactly_one_winner() {
    let cluster = Cluster::new();
    let store = cluster.store().await;

    let mut tasks = Vec::new();
    for writer in 0..16u8 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            store.put_if_absent("leader", &[writer]).await
        }));
    }

    let mut winners = Vec::new();
    for (writer, task) in tasks.into_iter().enumerate() {
        match task.await.unwrap() {
            Ok(()) => winners.push(writer as u8),
            Err(StoreError::DuplicateKey(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(store.get("leader").await.unwrap(), Some(winners));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_distinct_keys_all_land() {
    let cluster = Cluster::new();
    let store = cluster.store().await;

    let mut tasks = Vec::new();
    for writer in 0..8 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            for item in 0..10 {
                let key = format!("w{}-{}", writer, item);
                store.put_if_absent(&key, key.as_bytes()).await?;
            }
            Ok::<_, StoreError>(())
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let entries = store.entry_set().await.unwrap();
    assert_eq!(entries.len(), 80);
    assert!(entries.iter().all(|(key, value)| key.as_bytes() == value.as_slice()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn enumeration_tolerates_concurrent_removal() {
    let cluster = Cluster::new();
    let store = cluster.store().await;
    for i in 0..50 {
        store.put_if_absent(&format!("k{:02}", i), b"v").await.unwrap();
    }

    let remover = {
        let store = store.clone();
        tokio::spawn(async move {
            for i in (0..50).step_by(2) {
                store.remove(&format!("k{:02}", i)).await.unwrap();
            }
        })
    };
    let snapshot = store.entry_set().await.unwrap();
    remover.await.unwrap();

    // Odd keys were never touched; even keys may or may not have been seen
    for i in (1..50).step_by(2) {
        assert!(snapshot.contains_key(&format!("k{:02}", i)));
    }
    assert_eq!(store.size().await.unwrap(), 25);
}
