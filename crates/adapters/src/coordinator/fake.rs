// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory coordination service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Connector, Coordinator, CoordinatorError};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use zkv_core::node::MAX_PAYLOAD_BYTES;
use zkv_core::{path, Acl, ConnectString, CreateMode, ExpectedVersion, NodeStat};

/// Recorded coordinator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorCall {
    Create {
        session: u64,
        path: String,
        mode: CreateMode,
    },
    Delete {
        session: u64,
        path: String,
        version: ExpectedVersion,
    },
    Exists {
        session: u64,
        path: String,
        watch: bool,
    },
    GetData {
        session: u64,
        path: String,
        watch: bool,
    },
    SetData {
        session: u64,
        path: String,
        version: ExpectedVersion,
    },
    GetChildren {
        session: u64,
        path: String,
        watch: bool,
    },
    Close {
        session: u64,
    },
}

/// A node held by a [`FakeEnsemble`]
#[derive(Debug, Clone)]
pub struct FakeNode {
    pub data: Vec<u8>,
    pub stat: NodeStat,
    pub acl: Acl,
    children: BTreeSet<String>,
}

impl FakeNode {
    fn new(data: Vec<u8>, acl: Acl, zxid: u64, owner: Option<u64>) -> Self {
        let stat = NodeStat {
            czxid: zxid,
            mzxid: zxid,
            ephemeral_owner: owner,
            data_length: data.len(),
            ..NodeStat::default()
        };
        Self {
            data,
            stat,
            acl,
            children: BTreeSet::new(),
        }
    }
}

/// How an injected fault shows up
#[derive(Debug, Clone)]
enum Fault {
    /// Fail without touching the tree
    Fail(CoordinatorError),
    /// Apply the call, then report a lost connection
    LoseReply,
}

struct EnsembleState {
    nodes: BTreeMap<String, FakeNode>,
    zxid: u64,
    next_session: u64,
    expired: HashSet<u64>,
    closed: HashSet<u64>,
    faults: VecDeque<Fault>,
    calls: Vec<CoordinatorCall>,
}

impl Default for EnsembleState {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            path::DEFAULT_ROOT.to_string(),
            FakeNode::new(Vec::new(), Acl::open_unsafe(), 0, None),
        );
        Self {
            nodes,
            zxid: 0,
            next_session: 1,
            expired: HashSet::new(),
            closed: HashSet::new(),
            faults: VecDeque::new(),
            calls: Vec::new(),
        }
    }
}

/// A shared node tree that any number of fake sessions connect to
#[derive(Clone, Default)]
pub struct FakeEnsemble {
    state: Arc<Mutex<EnsembleState>>,
}

impl FakeEnsemble {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EnsembleState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a new session against this tree
    pub fn connect(&self) -> FakeCoordinator {
        let mut state = self.lock();
        let session = state.next_session;
        state.next_session += 1;
        FakeCoordinator {
            ensemble: self.clone(),
            session,
        }
    }

    /// Get all recorded calls, from every session
    pub fn calls(&self) -> Vec<CoordinatorCall> {
        self.lock().calls.clone()
    }

    /// Get a node by its full address
    pub fn node(&self, path: &str) -> Option<FakeNode> {
        self.lock().nodes.get(path).cloned()
    }

    /// All node addresses, in sorted order
    pub fn paths(&self) -> Vec<String> {
        self.lock().nodes.keys().cloned().collect()
    }

    /// Make the next `count` calls fail with `error` without being applied
    pub fn fail_next(&self, error: CoordinatorError, count: usize) {
        let mut state = self.lock();
        for _ in 0..count {
            state.faults.push_back(Fault::Fail(error.clone()));
        }
    }

    /// Apply the next `count` calls but report [`CoordinatorError::ConnectionLoss`]
    pub fn lose_replies(&self, count: usize) {
        let mut state = self.lock();
        for _ in 0..count {
            state.faults.push_back(Fault::LoseReply);
        }
    }

    /// Expire a session; its ephemeral nodes are removed
    pub fn expire_session(&self, session: u64) {
        let mut state = self.lock();
        state.expired.insert(session);
        state.remove_ephemerals(session);
    }
}

impl EnsembleState {
    /// Record the call, check the session, and take the next injected fault
    fn begin(
        &mut self,
        call: CoordinatorCall,
        session: u64,
    ) -> Result<Option<Fault>, CoordinatorError> {
        self.calls.push(call);
        if self.closed.contains(&session) {
            return Err(CoordinatorError::Closed);
        }
        if self.expired.contains(&session) {
            return Err(CoordinatorError::SessionExpired);
        }
        match self.faults.pop_front() {
            Some(Fault::Fail(error)) => Err(error),
            other => Ok(other),
        }
    }

    fn next_zxid(&mut self) -> u64 {
        self.zxid += 1;
        self.zxid
    }

    fn node(&self, path: &str) -> Result<&FakeNode, CoordinatorError> {
        self.nodes
            .get(path)
            .ok_or_else(|| CoordinatorError::NoNode(path.to_string()))
    }

    fn create(
        &mut self,
        path: &str,
        data: &[u8],
        acl: &Acl,
        mode: CreateMode,
        session: u64,
    ) -> Result<String, CoordinatorError> {
        path::validate(path).map_err(|e| CoordinatorError::BadArguments(e.to_string()))?;
        if data.len() > MAX_PAYLOAD_BYTES {
            return Err(CoordinatorError::DataTooLarge {
                len: data.len(),
                max: MAX_PAYLOAD_BYTES,
            });
        }
        let (parent_path, _) = split_parent(path)
            .ok_or_else(|| CoordinatorError::NodeExists(path.to_string()))?;

        let parent = self.node(&parent_path)?;
        if parent.stat.ephemeral_owner.is_some() {
            return Err(CoordinatorError::NoChildrenForEphemerals(parent_path));
        }
        let actual = if mode.is_sequential() {
            format!("{}{:010}", path, parent.stat.cversion)
        } else {
            path.to_string()
        };
        if self.nodes.contains_key(&actual) {
            return Err(CoordinatorError::NodeExists(actual));
        }

        let zxid = self.next_zxid();
        let owner = mode.is_ephemeral().then_some(session);
        self.nodes.insert(
            actual.clone(),
            FakeNode::new(data.to_vec(), acl.clone(), zxid, owner),
        );
        if let (Some(parent), Some((_, name))) =
            (self.nodes.get_mut(&parent_path), split_parent(&actual))
        {
            parent.children.insert(name);
            parent.stat.cversion += 1;
            parent.stat.num_children = parent.children.len();
        }
        Ok(actual)
    }

    fn delete(&mut self, path: &str, version: ExpectedVersion) -> Result<(), CoordinatorError> {
        let node = self.node(path)?;
        if !version.matches(node.stat.version) {
            return Err(CoordinatorError::BadVersion {
                path: path.to_string(),
                expected: version.as_i32(),
                actual: node.stat.version,
            });
        }
        if !node.children.is_empty() {
            return Err(CoordinatorError::NotEmpty(path.to_string()));
        }
        let Some((parent_path, name)) = split_parent(path) else {
            return Err(CoordinatorError::BadArguments(
                "cannot delete the root node".to_string(),
            ));
        };

        self.nodes.remove(path);
        self.next_zxid();
        if let Some(parent) = self.nodes.get_mut(&parent_path) {
            parent.children.remove(&name);
            parent.stat.cversion += 1;
            parent.stat.num_children = parent.children.len();
        }
        Ok(())
    }

    fn set_data(
        &mut self,
        path: &str,
        data: &[u8],
        version: ExpectedVersion,
    ) -> Result<NodeStat, CoordinatorError> {
        if data.len() > MAX_PAYLOAD_BYTES {
            return Err(CoordinatorError::DataTooLarge {
                len: data.len(),
                max: MAX_PAYLOAD_BYTES,
            });
        }
        let current = self.node(path)?.stat.version;
        if !version.matches(current) {
            return Err(CoordinatorError::BadVersion {
                path: path.to_string(),
                expected: version.as_i32(),
                actual: current,
            });
        }

        let zxid = self.next_zxid();
        let node = self
            .nodes
            .get_mut(path)
            .ok_or_else(|| CoordinatorError::NoNode(path.to_string()))?;
        node.data = data.to_vec();
        node.stat.version += 1;
        node.stat.mzxid = zxid;
        node.stat.data_length = data.len();
        Ok(node.stat.clone())
    }

    fn remove_ephemerals(&mut self, session: u64) {
        let owned: Vec<String> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.stat.ephemeral_owner == Some(session))
            .map(|(path, _)| path.clone())
            .collect();
        for path in owned {
            // Ephemeral nodes never have children
            let _ = self.delete(&path, ExpectedVersion::Any);
        }
    }
}

/// Split a full address into its parent address and last name
fn split_parent(path: &str) -> Option<(String, String)> {
    if path == path::DEFAULT_ROOT {
        return None;
    }
    let index = path.rfind(path::SEPARATOR)?;
    let parent = if index == 0 {
        path::DEFAULT_ROOT.to_string()
    } else {
        path[..index].to_string()
    };
    Some((parent, path[index + 1..].to_string()))
}

/// One fake session on a [`FakeEnsemble`]
#[derive(Clone)]
pub struct FakeCoordinator {
    ensemble: FakeEnsemble,
    session: u64,
}

impl Default for FakeCoordinator {
    fn default() -> Self {
        FakeEnsemble::new().connect()
    }
}

impl FakeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensemble(&self) -> &FakeEnsemble {
        &self.ensemble
    }

    /// Expire this session
    pub fn expire(&self) {
        self.ensemble.expire_session(self.session);
    }

    /// Run `op` after the session checks, honouring an injected lost reply
    fn run<T>(
        &self,
        call: CoordinatorCall,
        op: impl FnOnce(&mut EnsembleState) -> Result<T, CoordinatorError>,
    ) -> Result<T, CoordinatorError> {
        let mut state = self.ensemble.lock();
        let fault = state.begin(call, self.session)?;
        let result = op(&mut *state);
        match fault {
            Some(Fault::LoseReply) => Err(CoordinatorError::ConnectionLoss),
            _ => result,
        }
    }
}

#[async_trait]
impl Coordinator for FakeCoordinator {
    async fn create(
        &self,
        path: &str,
        data: &[u8],
        acl: &Acl,
        mode: CreateMode,
    ) -> Result<String, CoordinatorError> {
        let call = CoordinatorCall::Create {
            session: self.session,
            path: path.to_string(),
            mode,
        };
        let session = self.session;
        self.run(call, |state| state.create(path, data, acl, mode, session))
    }

    async fn delete(&self, path: &str, version: ExpectedVersion) -> Result<(), CoordinatorError> {
        let call = CoordinatorCall::Delete {
            session: self.session,
            path: path.to_string(),
            version,
        };
        self.run(call, |state| state.delete(path, version))
    }

    async fn exists(&self, path: &str, watch: bool) -> Result<Option<NodeStat>, CoordinatorError> {
        let call = CoordinatorCall::Exists {
            session: self.session,
            path: path.to_string(),
            watch,
        };
        self.run(call, |state| {
            Ok(state.nodes.get(path).map(|node| node.stat.clone()))
        })
    }

    async fn get_data(
        &self,
        path: &str,
        watch: bool,
    ) -> Result<(Vec<u8>, NodeStat), CoordinatorError> {
        let call = CoordinatorCall::GetData {
            session: self.session,
            path: path.to_string(),
            watch,
        };
        self.run(call, |state| {
            let node = state.node(path)?;
            Ok((node.data.clone(), node.stat.clone()))
        })
    }

    async fn set_data(
        &self,
        path: &str,
        data: &[u8],
        version: ExpectedVersion,
    ) -> Result<NodeStat, CoordinatorError> {
        let call = CoordinatorCall::SetData {
            session: self.session,
            path: path.to_string(),
            version,
        };
        self.run(call, |state| state.set_data(path, data, version))
    }

    async fn get_children(&self, path: &str, watch: bool) -> Result<Vec<String>, CoordinatorError> {
        let call = CoordinatorCall::GetChildren {
            session: self.session,
            path: path.to_string(),
            watch,
        };
        self.run(call, |state| {
            Ok(state.node(path)?.children.iter().cloned().collect())
        })
    }

    async fn get_children_with_stat(
        &self,
        path: &str,
        watch: bool,
    ) -> Result<(Vec<String>, NodeStat), CoordinatorError> {
        let call = CoordinatorCall::GetChildren {
            session: self.session,
            path: path.to_string(),
            watch,
        };
        self.run(call, |state| {
            let node = state.node(path)?;
            Ok((node.children.iter().cloned().collect(), node.stat.clone()))
        })
    }

    async fn close(&self) -> Result<(), CoordinatorError> {
        let mut state = self.ensemble.lock();
        state.calls.push(CoordinatorCall::Close {
            session: self.session,
        });
        if state.closed.insert(self.session) {
            state.remove_ephemerals(self.session);
        }
        Ok(())
    }

    fn session_id(&self) -> u64 {
        self.session
    }
}

/// Connector that opens sessions on a [`FakeEnsemble`]
#[derive(Clone, Default)]
pub struct FakeConnector {
    ensemble: FakeEnsemble,
    refuse: Arc<Mutex<bool>>,
    targets: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl FakeConnector {
    pub fn new(ensemble: FakeEnsemble) -> Self {
        Self {
            ensemble,
            ..Self::default()
        }
    }

    pub fn ensemble(&self) -> &FakeEnsemble {
        &self.ensemble
    }

    /// Make subsequent connection attempts fail
    pub fn refuse_connections(&self, refuse: bool) {
        *self.refuse.lock().unwrap_or_else(|e| e.into_inner()) = refuse;
    }

    /// Connect strings and session timeouts seen so far
    pub fn targets(&self) -> Vec<(String, Duration)> {
        self.targets.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Coordinator = FakeCoordinator;

    async fn connect(
        &self,
        target: &ConnectString,
        session_timeout: Duration,
    ) -> Result<FakeCoordinator, CoordinatorError> {
        self.targets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((target.to_string(), session_timeout));

        if *self.refuse.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(CoordinatorError::ConnectFailed(target.to_string()));
        }
        Ok(self.ensemble.connect())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
