// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced coordinator wrapper for consistent observability

use crate::coordinator::{Coordinator, CoordinatorError};
use async_trait::async_trait;
use tracing::Instrument;
use zkv_core::{Acl, CreateMode, ExpectedVersion, NodeStat};

/// Wrapper that adds tracing to any Coordinator
#[derive(Clone)]
pub struct TracedCoordinator<R> {
    inner: R,
}

impl<R> TracedCoordinator<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: Coordinator> Coordinator for TracedCoordinator<R> {
    async fn create(
        &self,
        path: &str,
        data: &[u8],
        acl: &Acl,
        mode: CreateMode,
    ) -> Result<String, CoordinatorError> {
        let span = tracing::info_span!("coordinator.create", path, mode = %mode);
        async {
            tracing::debug!(data_len = data.len(), acl_entries = acl.entries().len(), "creating");

            let start = std::time::Instant::now();
            let result = self.inner.create(path, data, acl, mode).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(created) => tracing::info!(
                    created = created.as_str(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "node created"
                ),
                // Losing a create race is an ordinary outcome
                Err(CoordinatorError::NodeExists(_)) => tracing::debug!("node already exists"),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "create failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, path: &str, version: ExpectedVersion) -> Result<(), CoordinatorError> {
        let span = tracing::info_span!("coordinator.delete", path, version = version.as_i32());
        async {
            let result = self.inner.delete(path, version).await;
            match &result {
                Ok(()) => tracing::info!("node deleted"),
                Err(CoordinatorError::NoNode(_)) => tracing::debug!("node already gone"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn exists(&self, path: &str, watch: bool) -> Result<Option<NodeStat>, CoordinatorError> {
        let result = self.inner.exists(path, watch).await;
        tracing::trace!(
            path,
            found = ?result.as_ref().ok().map(Option::is_some),
            "checked"
        );
        result
    }

    async fn get_data(
        &self,
        path: &str,
        watch: bool,
    ) -> Result<(Vec<u8>, NodeStat), CoordinatorError> {
        let span = tracing::debug_span!("coordinator.get_data", path);
        async {
            let result = self.inner.get_data(path, watch).await;
            tracing::debug!(
                data_len = result.as_ref().map(|(data, _)| data.len()).ok(),
                "read"
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn set_data(
        &self,
        path: &str,
        data: &[u8],
        version: ExpectedVersion,
    ) -> Result<NodeStat, CoordinatorError> {
        let span =
            tracing::info_span!("coordinator.set_data", path, version = version.as_i32());
        async {
            tracing::debug!(data_len = data.len(), "writing");
            let result = self.inner.set_data(path, data, version).await;

            match &result {
                Ok(stat) => tracing::info!(new_version = stat.version, "data written"),
                Err(e) => tracing::warn!(error = %e, "set_data failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn get_children(&self, path: &str, watch: bool) -> Result<Vec<String>, CoordinatorError> {
        let result = self.inner.get_children(path, watch).await;
        tracing::trace!(
            path,
            count = result.as_ref().map(|v| v.len()).ok(),
            "listed children"
        );
        result
    }

    async fn get_children_with_stat(
        &self,
        path: &str,
        watch: bool,
    ) -> Result<(Vec<String>, NodeStat), CoordinatorError> {
        let result = self.inner.get_children_with_stat(path, watch).await;
        tracing::trace!(
            path,
            count = result.as_ref().map(|(names, _)| names.len()).ok(),
            "listed children"
        );
        result
    }

    async fn close(&self) -> Result<(), CoordinatorError> {
        let span = tracing::info_span!("coordinator.close", session_id = self.inner.session_id());
        async {
            let result = self.inner.close().await;
            match &result {
                Ok(()) => tracing::info!("session closed"),
                Err(e) => tracing::warn!(error = %e, "close failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn session_id(&self) -> u64 {
        self.inner.session_id()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
