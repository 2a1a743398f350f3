// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validating session facade over a [`Coordinator`]
//!
//! Every operation takes a [`Path`] that must be absolute. The path's root and
//! path are joined into the full server-side address before the call is sent.
//! A resilient session routes each call through a [`RetryExecutor`]; a plain
//! one issues it exactly once.

use crate::error::SessionError;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use zkv_adapters::{Connector, Coordinator, CoordinatorError};
use zkv_core::{
    Acl, ClientConfig, Clock, CreateMode, ExpectedVersion, NodeStat, Path, RetryExecutor,
    RetryPolicy, SystemClock,
};

/// A session with the coordination service
///
/// Cloning is cheap when the coordinator is, and clones share the remote
/// session. Concurrent callers need no extra synchronization.
#[derive(Clone)]
pub struct CoordinationSession<R, C = SystemClock> {
    remote: R,
    root: String,
    retry: Option<RetryExecutor<C>>,
    cancel: CancellationToken,
}

impl<R: Coordinator> CoordinationSession<R, SystemClock> {
    /// A session that issues every call once
    pub fn new(remote: R) -> Self {
        Self::build(remote, None)
    }

    /// A session that retries transient failures under `policy`
    pub fn resilient(remote: R, policy: RetryPolicy) -> Self {
        Self::build(remote, Some(RetryExecutor::new(policy)))
    }
}

impl<R: Coordinator, C: Clock> CoordinationSession<R, C> {
    fn build(remote: R, retry: Option<RetryExecutor<C>>) -> Self {
        Self {
            remote,
            root: zkv_core::path::DEFAULT_ROOT.to_string(),
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// A resilient session driven by an explicit executor
    pub fn with_executor(remote: R, executor: RetryExecutor<C>) -> Self {
        Self::build(remote, Some(executor))
    }

    /// Open a session as described by `config`.
    ///
    /// The session is rooted at the connect string's chroot and is resilient
    /// iff the config carries a retry policy. Connectors hand back a session
    /// on the bare server namespace; the chroot is applied here.
    pub async fn connect<K>(
        connector: &K,
        config: &ClientConfig,
        clock: C,
    ) -> Result<Self, SessionError>
    where
        K: Connector<Coordinator = R>,
    {
        let remote = connector
            .connect(&config.connect, config.session_timeout)
            .await?;
        let retry = config
            .retry
            .clone()
            .map(|policy| RetryExecutor::with_clock(policy, clock));

        tracing::info!(
            connect = %config.connect,
            session_id = remote.session_id(),
            resilient = retry.is_some(),
            "session established"
        );

        Self::build(remote, retry).with_root(config.connect.root())
    }

    /// Place paths built by [`path`](Self::path) under `root`
    pub fn with_root(mut self, root: &str) -> Result<Self, SessionError> {
        zkv_core::path::validate(root)?;
        self.root = root.to_string();
        Ok(self)
    }

    /// Interrupt backoff waits of this session's calls when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// An absolute path under this session's root
    pub fn path(&self, path: &str) -> Result<Path, SessionError> {
        Ok(Path::with_root(&self.root, path)?)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_resilient(&self) -> bool {
        self.retry.is_some()
    }

    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref().map(RetryExecutor::policy)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Create a node, returning the actual path under the input's root
    pub async fn create(
        &self,
        path: &Path,
        data: &[u8],
        acl: &Acl,
        mode: CreateMode,
    ) -> Result<Path, SessionError> {
        let (root, address) = address(path)?;
        let created = self
            .dispatch("create", || self.remote.create(&address, data, acl, mode))
            .await?;
        Ok(Path::from_real(root, &created)?)
    }

    pub async fn delete(&self, path: &Path, version: ExpectedVersion) -> Result<(), SessionError> {
        let (_, address) = address(path)?;
        self.dispatch("delete", || self.remote.delete(&address, version))
            .await
    }

    pub async fn exists(&self, path: &Path, watch: bool) -> Result<Option<NodeStat>, SessionError> {
        let (_, address) = address(path)?;
        self.dispatch("exists", || self.remote.exists(&address, watch))
            .await
    }

    pub async fn get_data(
        &self,
        path: &Path,
        watch: bool,
    ) -> Result<(Vec<u8>, NodeStat), SessionError> {
        let (_, address) = address(path)?;
        self.dispatch("get_data", || self.remote.get_data(&address, watch))
            .await
    }

    pub async fn set_data(
        &self,
        path: &Path,
        data: &[u8],
        version: ExpectedVersion,
    ) -> Result<NodeStat, SessionError> {
        let (_, address) = address(path)?;
        self.dispatch("set_data", || self.remote.set_data(&address, data, version))
            .await
    }

    /// Children of `path`, each as a full path under the same root
    pub async fn get_children(&self, path: &Path, watch: bool) -> Result<Vec<Path>, SessionError> {
        let (_, address) = address(path)?;
        let names = self
            .dispatch("get_children", || self.remote.get_children(&address, watch))
            .await?;
        child_paths(path, &names)
    }

    /// Children of `path` as full paths, plus the metadata of `path` itself
    /// from the same read
    pub async fn get_children_with_stat(
        &self,
        path: &Path,
        watch: bool,
    ) -> Result<(Vec<Path>, NodeStat), SessionError> {
        let (_, address) = address(path)?;
        let (names, stat) = self
            .dispatch("get_children", || {
                self.remote.get_children_with_stat(&address, watch)
            })
            .await?;
        Ok((child_paths(path, &names)?, stat))
    }

    /// End the remote session. Not retried.
    pub async fn close(&self) -> Result<(), SessionError> {
        Ok(self.remote.close().await?)
    }

    /// Run one remote call, through the retry executor when there is one
    async fn dispatch<T, F, Fut>(
        &self,
        operation: &'static str,
        mut op: F,
    ) -> Result<T, SessionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoordinatorError>>,
    {
        match &self.retry {
            Some(executor) => Ok(executor.execute_until(operation, &self.cancel, op).await?),
            None => Ok(op().await?),
        }
    }
}

/// The root and full server-side address of an absolute path
fn address(path: &Path) -> Result<(&str, String), SessionError> {
    match path.root() {
        Some(root) => Ok((root, path.to_string())),
        None => Err(SessionError::RelativePath(path.to_string())),
    }
}

/// Turn child names returned for `parent` into full paths
fn child_paths(parent: &Path, names: &[String]) -> Result<Vec<Path>, SessionError> {
    names
        .iter()
        .map(|name| parent.resolve_child_str(name).map_err(SessionError::from))
        .collect()
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
