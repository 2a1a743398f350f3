// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path filters

use super::Path;

/// A predicate over paths
pub trait PathFilter {
    fn accept(&self, path: &Path) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn accept(&self, path: &Path) -> bool {
        self(path)
    }
}

/// The paths accepted by `filter`, in input order
pub fn filter_paths<'a, I, F>(paths: I, filter: &F) -> Vec<Path>
where
    I: IntoIterator<Item = &'a Path>,
    F: PathFilter + ?Sized,
{
    paths
        .into_iter()
        .filter(|path| filter.accept(path))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
