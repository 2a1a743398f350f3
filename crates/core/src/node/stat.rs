// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Largest payload the remote capability accepts for a single node
pub const MAX_PAYLOAD_BYTES: usize = 0xfffff;

/// Version precondition for writes and deletes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExpectedVersion {
    /// Act regardless of the node's current version
    #[default]
    Any,
    /// Act only if the node is at exactly this version
    Exact(i32),
}

impl ExpectedVersion {
    /// Wire encoding: `-1` means "any version"
    pub fn as_i32(self) -> i32 {
        match self {
            ExpectedVersion::Any => -1,
            ExpectedVersion::Exact(version) => version,
        }
    }

    pub fn matches(self, version: i32) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(expected) => expected == version,
        }
    }
}

/// Node metadata returned by the remote capability
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NodeStat {
    /// Transaction id that created the node
    pub czxid: u64,
    /// Transaction id that last modified the node's data
    pub mzxid: u64,
    /// Number of data changes
    pub version: i32,
    /// Number of child changes; sequential children take it as their suffix
    pub cversion: i32,
    /// Owning session for ephemeral nodes
    pub ephemeral_owner: Option<u64>,
    pub data_length: usize,
    pub num_children: usize,
}
