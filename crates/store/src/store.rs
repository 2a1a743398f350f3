// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Map-like store where each child of a root node is one key
//!
//! Every operation is a single independent remote call, except
//! [`put_all`](ActiveKeyValueStore::put_all) and the enumeration operations,
//! which are sequences of independent calls. There is no client-side locking
//! or caching.

use crate::error::{SessionError, StoreError};
use crate::session::CoordinationSession;
use std::collections::BTreeMap;
use zkv_adapters::{Coordinator, CoordinatorError};
use zkv_core::{path, Acl, Clock, CreateMode, ExpectedVersion, Path, SystemClock};

/// Key-value store over the children of `root`
#[derive(Clone)]
pub struct ActiveKeyValueStore<R, C = SystemClock> {
    session: CoordinationSession<R, C>,
    root: Path,
    acl: Acl,
}

impl<R: Coordinator, C: Clock> ActiveKeyValueStore<R, C> {
    /// A store over an existing root node
    pub fn new(session: CoordinationSession<R, C>, root: Path) -> Result<Self, StoreError> {
        if !root.is_absolute() {
            return Err(SessionError::RelativePath(root.to_string()).into());
        }
        Ok(Self {
            session,
            root,
            acl: Acl::open_unsafe(),
        })
    }

    /// A store over `root`, creating it and any missing ancestors below the
    /// root's chroot first
    pub async fn open(session: CoordinationSession<R, C>, root: Path) -> Result<Self, StoreError> {
        let store = Self::new(session, root)?;

        let mut missing = Vec::new();
        let mut next = Some(store.root.clone());
        while let Some(node) = next {
            if node.is_root() {
                break;
            }
            next = node.parent();
            missing.push(node);
        }

        for node in missing.iter().rev() {
            match store
                .session
                .create(node, &[], &store.acl, CreateMode::Persistent)
                .await
            {
                Ok(_) => tracing::debug!(path = %node, "created store ancestor"),
                Err(SessionError::Remote(CoordinatorError::NodeExists(_))) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(store)
    }

    /// Use `acl` for nodes created from now on
    pub fn with_acl(mut self, acl: Acl) -> Self {
        self.acl = acl;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session(&self) -> &CoordinationSession<R, C> {
        &self.session
    }

    /// Store `value` under `key` unless the key already exists.
    ///
    /// Existence is decided by the create call itself, never by a prior check.
    pub async fn put_if_absent(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let node = self.key_path(key)?;
        match self
            .session
            .create(&node, value, &self.acl, CreateMode::Persistent)
            .await
        {
            Ok(_) => Ok(()),
            Err(SessionError::Remote(CoordinatorError::NodeExists(_))) => {
                Err(StoreError::DuplicateKey(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// [`put_if_absent`](Self::put_if_absent) each entry in iteration order.
    ///
    /// Stops at the first failure. Entries stored before it stay stored.
    pub async fn put_all<I, K, V>(&self, entries: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[u8]>,
    {
        for (key, value) in entries {
            self.put_if_absent(key.as_ref(), value.as_ref()).await?;
        }
        Ok(())
    }

    /// Overwrite the value of an existing key, whatever its version
    pub async fn replace(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.write(key, value, ExpectedVersion::Any).await.map(|_| ())
    }

    /// Overwrite the value only if the key is at `version`; returns the new version
    pub async fn replace_versioned(
        &self,
        key: &str,
        value: &[u8],
        version: i32,
    ) -> Result<i32, StoreError> {
        self.write(key, value, ExpectedVersion::Exact(version)).await
    }

    async fn write(
        &self,
        key: &str,
        value: &[u8],
        version: ExpectedVersion,
    ) -> Result<i32, StoreError> {
        let node = self.key_path(key)?;
        self.session
            .set_data(&node, value, version)
            .await
            .map(|stat| stat.version)
            .map_err(|e| translate(key, e))
    }

    /// The current value, or `None` if the key does not exist
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get_versioned(key).await?.map(|(value, _)| value))
    }

    /// The current value and its version, or `None` if the key does not exist
    pub async fn get_versioned(&self, key: &str) -> Result<Option<(Vec<u8>, i32)>, StoreError> {
        let node = self.key_path(key)?;
        match self.session.get_data(&node, false).await {
            Ok((value, stat)) => Ok(Some((value, stat.version))),
            Err(SessionError::Remote(CoordinatorError::NoNode(_))) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn contains_key(&self, key: &str) -> Result<bool, StoreError> {
        let node = self.key_path(key)?;
        Ok(self.session.exists(&node, false).await?.is_some())
    }

    /// Delete a key, whatever its version
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.delete(key, ExpectedVersion::Any).await
    }

    /// Delete a key only if it is at `version`
    pub async fn remove_versioned(&self, key: &str, version: i32) -> Result<(), StoreError> {
        self.delete(key, ExpectedVersion::Exact(version)).await
    }

    async fn delete(&self, key: &str, version: ExpectedVersion) -> Result<(), StoreError> {
        let node = self.key_path(key)?;
        self.session
            .delete(&node, version)
            .await
            .map_err(|e| translate(key, e))
    }

    /// Current keys. A snapshot that concurrent writers may already have changed.
    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let children = self.session.get_children(&self.root, false).await?;
        Ok(children
            .iter()
            .filter_map(|child| child.last_name().map(str::to_string))
            .collect())
    }

    /// All entries, read one key at a time.
    ///
    /// Keys removed between listing and reading are left out. The result is
    /// not a consistent snapshot of the store at any single instant.
    pub async fn entry_set(&self) -> Result<BTreeMap<String, Vec<u8>>, StoreError> {
        let mut entries = BTreeMap::new();
        for key in self.keys().await? {
            match self.get(&key).await? {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => tracing::debug!(key = %key, "key removed during enumeration"),
            }
        }
        Ok(entries)
    }

    /// Number of keys right now; racy like [`keys`](Self::keys)
    pub async fn size(&self) -> Result<usize, StoreError> {
        Ok(self.keys().await?.len())
    }

    /// Whether the store holds no keys right now; racy like [`keys`](Self::keys)
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.size().await? == 0)
    }

    /// Not supported.
    pub async fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("clear"))
    }

    fn key_path(&self, key: &str) -> Result<Path, StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let invalid = |e: zkv_core::PathError| StoreError::InvalidKey {
            key: key.to_string(),
            reason: e.to_string(),
        };
        path::validate_name(key).map_err(invalid)?;
        self.root.resolve_child_str(key).map_err(invalid)
    }
}

/// Map remote signals on an existing key to store errors
fn translate(key: &str, err: SessionError) -> StoreError {
    match err {
        SessionError::Remote(CoordinatorError::NoNode(_)) => StoreError::NoSuchKey(key.to_string()),
        SessionError::Remote(CoordinatorError::BadVersion {
            expected, actual, ..
        }) => StoreError::VersionConflict {
            key: key.to_string(),
            expected,
            actual,
        },
        other => other.into(),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
