// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access control lists
//!
//! ACLs are passed through to the remote capability as opaque values; only
//! the open, all-permissions default is constructed here.

use std::fmt;
use std::ops::BitOr;

/// Permission bits, encoded the way the coordination service expects them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Permissions(u32);

impl Permissions {
    pub const READ: Self = Self(1);
    pub const WRITE: Self = Self(1 << 1);
    pub const CREATE: Self = Self(1 << 2);
    pub const DELETE: Self = Self(1 << 3);
    pub const ADMIN: Self = Self(1 << 4);
    pub const ALL: Self = Self(0b1_1111);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Authentication scheme of an ACL entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AclScheme {
    World,
    Auth,
    Digest,
    Ip,
}

impl AclScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            AclScheme::World => "world",
            AclScheme::Auth => "auth",
            AclScheme::Digest => "digest",
            AclScheme::Ip => "ip",
        }
    }
}

impl fmt::Display for AclScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (scheme, identity, permissions) grant
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AclEntry {
    pub scheme: AclScheme,
    pub id: String,
    pub permissions: Permissions,
}

/// An access control list
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Acl {
    entries: Vec<AclEntry>,
}

impl Acl {
    pub fn new(entries: Vec<AclEntry>) -> Self {
        Self { entries }
    }

    /// Anyone may do anything: `world:anyone` with all permissions
    pub fn open_unsafe() -> Self {
        Self::new(vec![AclEntry {
            scheme: AclScheme::World,
            id: "anyone".to_string(),
            permissions: Permissions::ALL,
        }])
    }

    pub fn entries(&self) -> &[AclEntry] {
        &self.entries
    }
}
