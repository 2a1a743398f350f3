//! Shared fixtures for specs

pub use std::time::Duration;
pub use tokio_util::sync::CancellationToken;
pub use zkv_adapters::{Coordinator, CoordinatorError, FakeConnector, FakeCoordinator, FakeEnsemble};
pub use zkv_core::{path, Acl, ClientConfig, CreateMode, ExpectedVersion, FakeClock, Path};
pub use zkv_store::{ActiveKeyValueStore, CoordinationSession, SessionError, StoreError};

pub type Session = CoordinationSession<FakeCoordinator, FakeClock>;
pub type Store = ActiveKeyValueStore<FakeCoordinator, FakeClock>;

/// An in-memory ensemble plus a connector for opening sessions on it
pub struct Cluster {
    pub ensemble: FakeEnsemble,
    pub connector: FakeConnector,
    pub clock: FakeClock,
}

impl Cluster {
    pub fn new() -> Self {
        let ensemble = FakeEnsemble::new();
        Self {
            connector: FakeConnector::new(ensemble.clone()),
            ensemble,
            clock: FakeClock::new(),
        }
    }

    /// Connect with a TOML client config
    pub async fn connect(&self, config: &str) -> Session {
        let config = ClientConfig::from_toml_str(config).unwrap();
        CoordinationSession::connect(&self.connector, &config, self.clock.clone())
            .await
            .unwrap()
    }

    /// A resilient session with a 3 retry budget, rooted at `/`
    pub async fn resilient(&self) -> Session {
        self.connect(
            r#"
            connect = "zk:2181"
            [retry]
            max_retries = 3
            retry_delay = "100ms"
            "#,
        )
        .await
    }

    /// A store at `/kv` on a plain session
    pub async fn store(&self) -> Store {
        let session = self.connect(r#"connect = "zk:2181""#).await;
        let root = session.path("/kv").unwrap();
        ActiveKeyValueStore::open(session, root).await.unwrap()
    }
}
