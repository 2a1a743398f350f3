// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Lifetime and naming of a newly created node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CreateMode {
    /// Survives the creating session
    #[default]
    Persistent,
    /// Persistent, with a server-assigned sequence suffix
    PersistentSequential,
    /// Removed when the creating session ends
    Ephemeral,
    /// Ephemeral, with a server-assigned sequence suffix
    EphemeralSequential,
}

impl CreateMode {
    pub fn is_sequential(self) -> bool {
        matches!(
            self,
            CreateMode::PersistentSequential | CreateMode::EphemeralSequential
        )
    }

    pub fn is_ephemeral(self) -> bool {
        matches!(self, CreateMode::Ephemeral | CreateMode::EphemeralSequential)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreateMode::Persistent => "persistent",
            CreateMode::PersistentSequential => "persistent-sequential",
            CreateMode::Ephemeral => "ephemeral",
            CreateMode::EphemeralSequential => "ephemeral-sequential",
        }
    }
}

impl fmt::Display for CreateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
