// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node attributes shared by the session and the remote capability

mod acl;
mod mode;
mod stat;

pub use acl::{Acl, AclEntry, AclScheme, Permissions};
pub use mode::CreateMode;
pub use stat::{ExpectedVersion, NodeStat, MAX_PAYLOAD_BYTES};

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
