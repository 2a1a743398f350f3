//! Session resilience specs
//!
//! Verify retry of transient failures and the limits of that retry.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn transient_failures_within_budget_are_invisible() {
    let cluster = Cluster::new();
    let session = cluster.resilient().await;
    let store = ActiveKeyValueStore::open(session, Path::new("/kv").unwrap())
        .await
        .unwrap();

    cluster.ensemble.fail_next(CoordinatorError::ConnectionLoss, 3);
    store.put_if_absent("k", b"v").await.unwrap();

    assert_eq!(cluster.clock.sleeps(), vec![Duration::from_millis(100); 3]);
}

#[tokio::test]
async fn exhausted_budget_surfaces_connection_loss() {
    let cluster = Cluster::new();
    let store = ActiveKeyValueStore::open(cluster.resilient().await, Path::new("/kv").unwrap())
        .await
        .unwrap();

    cluster.ensemble.fail_next(CoordinatorError::ConnectionLoss, 4);
    assert_eq!(
        store.get("k").await,
        Err(StoreError::Session(SessionError::Remote(
            CoordinatorError::ConnectionLoss
        )))
    );
}

#[tokio::test]
async fn expired_session_is_not_retried() {
    let cluster = Cluster::new();
    let session = cluster.resilient().await;
    session.remote().expire();

    let result = session.exists(&Path::root_path(), false).await;
    assert_eq!(
        result,
        Err(SessionError::Remote(CoordinatorError::SessionExpired))
    );
    assert!(cluster.clock.sleeps().is_empty());
}

#[tokio::test]
async fn lost_create_reply_reads_as_duplicate_on_retry() {
    let cluster = Cluster::new();
    let store = ActiveKeyValueStore::open(cluster.resilient().await, Path::new("/kv").unwrap())
        .await
        .unwrap();

    // The first create lands but its reply is lost; the retry then collides
    cluster.ensemble.lose_replies(1);
    assert_eq!(
        store.put_if_absent("k", b"v").await,
        Err(StoreError::DuplicateKey("k".to_string()))
    );
    assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
}

#[tokio::test]
async fn lost_delete_reply_reads_as_missing_on_retry() {
    let cluster = Cluster::new();
    let store = ActiveKeyValueStore::open(cluster.resilient().await, Path::new("/kv").unwrap())
        .await
        .unwrap();
    store.put_if_absent("k", b"v").await.unwrap();

    cluster.ensemble.lose_replies(1);
    assert_eq!(
        store.remove("k").await,
        Err(StoreError::NoSuchKey("k".to_string()))
    );
    assert!(!store.contains_key("k").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn cancelling_a_session_interrupts_its_backoff() {
    let ensemble = FakeEnsemble::new();
    let cancel = CancellationToken::new();
    let session = CoordinationSession::resilient(
        ensemble.connect(),
        zkv_core::RetryPolicy::new(10, Duration::from_secs(30)),
    )
    .with_cancellation(cancel.clone());

    ensemble.fail_next(CoordinatorError::ConnectionLoss, 10);
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(45)).await;
        cancel.cancel();
    });

    let result = session.get_children(&Path::root_path(), false).await;
    canceller.await.unwrap();

    assert_eq!(
        result,
        Err(SessionError::Interrupted {
            operation: "get_children",
            attempts: 2
        })
    );
}

#[tokio::test]
async fn plain_session_from_config_never_retries() {
    let cluster = Cluster::new();
    let session = cluster.connect(r#"connect = "zk:2181""#).await;
    assert!(!session.is_resilient());

    cluster.ensemble.fail_next(CoordinatorError::ConnectionLoss, 1);
    assert_eq!(
        session.get_data(&Path::root_path(), false).await,
        Err(SessionError::Remote(CoordinatorError::ConnectionLoss))
    );
    assert_eq!(
        session.set_data(&Path::root_path(), b"v", ExpectedVersion::Any).await.unwrap().version,
        1
    );
}
