// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The remote coordination service, as seen by the client
//!
//! Paths passed to a [`Coordinator`] are full server-side addresses: any
//! chroot has already been applied by the caller.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CoordinatorCall, FakeConnector, FakeCoordinator, FakeEnsemble, FakeNode};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use zkv_core::{Acl, ConnectString, CreateMode, ExpectedVersion, NodeStat, Retryable};

/// Errors from the remote coordination service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("connection lost")]
    ConnectionLoss,
    #[error("session expired")]
    SessionExpired,
    #[error("authentication failed")]
    AuthFailed,
    #[error("session closed")]
    Closed,
    #[error("connection failed: {0}")]
    ConnectFailed(String),
    #[error("bad arguments: {0}")]
    BadArguments(String),
    #[error("node does not exist: {0}")]
    NoNode(String),
    #[error("node already exists: {0}")]
    NodeExists(String),
    #[error("version mismatch for {path}: expected {expected}, found {actual}")]
    BadVersion {
        path: String,
        expected: i32,
        actual: i32,
    },
    #[error("node has children: {0}")]
    NotEmpty(String),
    #[error("ephemeral node cannot have children: {0}")]
    NoChildrenForEphemerals(String),
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    DataTooLarge { len: usize, max: usize },
}

impl Retryable for CoordinatorError {
    /// Only a lost connection leaves the outcome unknown; everything else is
    /// a definite answer or a dead session.
    fn is_transient(&self) -> bool {
        matches!(self, CoordinatorError::ConnectionLoss)
    }
}

/// Operations offered by a connected coordination service session
#[async_trait]
pub trait Coordinator: Clone + Send + Sync + 'static {
    /// Create a node and return its actual address, which carries a sequence
    /// suffix for sequential modes
    async fn create(
        &self,
        path: &str,
        data: &[u8],
        acl: &Acl,
        mode: CreateMode,
    ) -> Result<String, CoordinatorError>;

    async fn delete(&self, path: &str, version: ExpectedVersion) -> Result<(), CoordinatorError>;

    /// Metadata of the node, or `None` if it does not exist
    async fn exists(&self, path: &str, watch: bool) -> Result<Option<NodeStat>, CoordinatorError>;

    async fn get_data(
        &self,
        path: &str,
        watch: bool,
    ) -> Result<(Vec<u8>, NodeStat), CoordinatorError>;

    async fn set_data(
        &self,
        path: &str,
        data: &[u8],
        version: ExpectedVersion,
    ) -> Result<NodeStat, CoordinatorError>;

    /// Names (single segments) of the node's children
    async fn get_children(&self, path: &str, watch: bool) -> Result<Vec<String>, CoordinatorError>;

    /// Children names together with the parent's metadata, read atomically
    async fn get_children_with_stat(
        &self,
        path: &str,
        watch: bool,
    ) -> Result<(Vec<String>, NodeStat), CoordinatorError>;

    /// End the session; its ephemeral nodes go away
    async fn close(&self) -> Result<(), CoordinatorError>;

    fn session_id(&self) -> u64;
}

/// Establishes sessions with a coordination service
#[async_trait]
pub trait Connector: Send + Sync {
    type Coordinator: Coordinator;

    async fn connect(
        &self,
        target: &ConnectString,
        session_timeout: Duration,
    ) -> Result<Self::Coordinator, CoordinatorError>;
}
