// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordering of sequential nodes by their server-assigned sequence id
//!
//! Sequential nodes get a numeric suffix after the last `-` of their name,
//! e.g. `x-0000000042` or `lock-<session>-0000000007`. Ids are compared as
//! integers, so the ordering does not depend on zero padding.

use super::{Path, PathError};
use std::cmp::Ordering;

impl Path {
    /// The numeric suffix after the last `-` of the last name
    pub fn sequence_id(&self) -> Result<u64, PathError> {
        let name = self
            .last_name()
            .ok_or_else(|| PathError::MissingSequenceId(self.to_string()))?;
        let (_, id) = name
            .rsplit_once('-')
            .ok_or_else(|| PathError::MissingSequenceId(self.to_string()))?;

        let invalid = || PathError::InvalidSequenceId {
            path: self.to_string(),
            id: id.to_string(),
        };
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        id.parse::<u64>().map_err(|_| invalid())
    }
}

/// Compare two paths by sequence id
pub fn compare_sequence_ids(a: &Path, b: &Path) -> Result<Ordering, PathError> {
    Ok(a.sequence_id()?.cmp(&b.sequence_id()?))
}

/// Sort paths into creation order.
///
/// Every path is checked before anything moves, so on error the slice is left
/// untouched.
pub fn sort_by_sequence_id(paths: &mut [Path]) -> Result<(), PathError> {
    let ids = paths
        .iter()
        .map(Path::sequence_id)
        .collect::<Result<Vec<_>, _>>()?;

    let mut keyed: Vec<(u64, Path)> = ids.into_iter().zip(paths.iter().cloned()).collect();
    keyed.sort_by_key(|(id, _)| *id);
    for (slot, (_, path)) in paths.iter_mut().zip(keyed) {
        *slot = path;
    }
    Ok(())
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
