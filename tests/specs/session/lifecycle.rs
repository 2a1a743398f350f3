//! Session lifecycle specs
//!
//! Verify connection, chroot placement, ephemeral ownership, and sequential
//! node ordering.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn chroot_isolates_tenants() {
    let cluster = Cluster::new();
    let admin = cluster.connect(r#"connect = "zk:2181""#).await;
    for tenant in ["/alpha", "/beta"] {
        admin
            .create(
                &Path::new(tenant).unwrap(),
                b"",
                &Acl::open_unsafe(),
                CreateMode::Persistent,
            )
            .await
            .unwrap();
    }

    let alpha = cluster.connect(r#"connect = "zk:2181/alpha""#).await;
    let beta = cluster.connect(r#"connect = "zk:2181/beta""#).await;
    let alpha_store = ActiveKeyValueStore::open(alpha.clone(), alpha.path("/kv").unwrap())
        .await
        .unwrap();
    let beta_store = ActiveKeyValueStore::open(beta.clone(), beta.path("/kv").unwrap())
        .await
        .unwrap();

    alpha_store.put_if_absent("k", b"a").await.unwrap();
    assert_eq!(beta_store.get("k").await.unwrap(), None);
    assert!(cluster.ensemble.node("/alpha/kv/k").is_some());
    assert!(cluster.ensemble.node("/beta/kv/k").is_none());
}

#[tokio::test]
async fn ephemeral_nodes_end_with_their_session() {
    let cluster = Cluster::new();
    let owner = cluster.connect(r#"connect = "zk:2181""#).await;
    let observer = cluster.connect(r#"connect = "zk:2181""#).await;
    let lock = owner.path("/lock").unwrap();

    owner
        .create(&lock, b"owner", &Acl::open_unsafe(), CreateMode::Ephemeral)
        .await
        .unwrap();
    let stat = observer.exists(&lock, false).await.unwrap().unwrap();
    assert_eq!(stat.ephemeral_owner, Some(owner.remote().session_id()));

    owner.close().await.unwrap();

    assert_eq!(observer.exists(&lock, false).await.unwrap(), None);
    assert_eq!(
        owner.exists(&lock, false).await,
        Err(SessionError::Remote(CoordinatorError::Closed))
    );
}

#[tokio::test]
async fn sequential_children_sort_into_creation_order() {
    let cluster = Cluster::new();
    let session = cluster.connect(r#"connect = "zk:2181""#).await;
    let queue = session.path("/queue").unwrap();
    session
        .create(&queue, b"", &Acl::open_unsafe(), CreateMode::Persistent)
        .await
        .unwrap();

    let prefix = queue.resolve_child_str("x-").unwrap();
    let mut created = Vec::new();
    for _ in 0..899 {
        let node = session
            .create(&prefix, b"", &Acl::open_unsafe(), CreateMode::PersistentSequential)
            .await
            .unwrap();
        created.push(node);
    }

    let mut children = session.get_children(&queue, false).await.unwrap();
    // Scramble the listing with a fixed permutation
    let len = children.len();
    children = (0..len).map(|i| children[(i * 337) % len].clone()).collect();

    path::sort_by_sequence_id(&mut children).unwrap();
    assert_eq!(children, created);
    assert_eq!(children[100].sequence_id().unwrap(), 100);
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let cluster = Cluster::new();
    cluster.connector.refuse_connections(true);
    let config = ClientConfig::from_toml_str(r#"connect = "zk:2181""#).unwrap();

    let result = CoordinationSession::connect(&cluster.connector, &config, cluster.clock.clone()).await;
    assert!(matches!(
        result.err(),
        Some(SessionError::Remote(CoordinatorError::ConnectFailed(_)))
    ));
}
