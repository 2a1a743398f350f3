// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node paths in the coordination service hierarchy
//!
//! Paths to nodes are canonical, slash-separated addresses. An absolute path
//! starts with `/` and carries a *root suffix* (chroot): every concrete
//! operation addresses `root + path`. With the root `/app1/a` the path
//! `/foo/bar` names the node `/app1/a/foo/bar` on the server.
//!
//! Relative paths (`app1/a/b`) have no root and are never sent to the server.
//! They exist to express parent/child/sibling relationships between absolute
//! paths. The components of a path are its *names*: `/a/b/c` has the names
//! `a`, `b` and `c`, and the root path `/` has none.
//!
//! Paths are immutable; every derivation returns a new value.

mod filter;
mod grammar;
mod sequence;

pub use filter::{filter_paths, PathFilter};
pub use grammar::{validate, validate_name, DEFAULT_ROOT, SEPARATOR};
pub use sequence::{compare_sequence_ids, sort_by_sequence_id};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from path construction and derivation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("name index {index} out of range for a path with {count} names")]
    NameIndexOutOfRange { index: usize, count: usize },
    #[error("expected a relative path, got {0:?}")]
    NotRelative(String),
    #[error("expected an absolute path, got {0:?}")]
    NotAbsolute(String),
    #[error("path is already absolute: {0:?}")]
    AlreadyAbsolute(String),
    #[error("root components do not match: {expected:?} and {actual:?}")]
    MismatchedRoot { expected: String, actual: String },
    #[error("{base:?} is not a proper prefix of {other:?}")]
    NotAPrefix { base: String, other: String },
    #[error("no sequence id in path {0:?}")]
    MissingSequenceId(String),
    #[error("invalid sequence id {id:?} in path {path:?}")]
    InvalidSequenceId { path: String, id: String },
}

/// An absolute or relative node path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    root: Option<String>,
    path: String,
    names: Vec<String>,
}

impl Path {
    /// Parse a path string.
    ///
    /// Strings starting with `/` become absolute paths under the default root.
    /// Anything else becomes a relative path, validated as if it were
    /// prefixed with `/`.
    pub fn new(path: &str) -> Result<Self, PathError> {
        if path.starts_with(SEPARATOR) {
            grammar::validate(path)?;
            return Ok(Self::from_parts(
                Some(DEFAULT_ROOT.to_string()),
                path.to_string(),
            ));
        }

        if path.is_empty() {
            return Err(PathError::InvalidPath {
                path: String::new(),
                reason: "relative path must not be empty".to_string(),
            });
        }
        grammar::validate(&format!("{}{}", SEPARATOR, path)).map_err(|e| relabel(e, path))?;
        Ok(Self::from_parts(None, path.to_string()))
    }

    /// Build an absolute path under the given root suffix.
    ///
    /// Both operands must be valid absolute addresses. Pass `/` as `path` to
    /// address the root itself.
    pub fn with_root(root: &str, path: &str) -> Result<Self, PathError> {
        grammar::validate(root)?;
        grammar::validate(path)?;
        Ok(Self::from_parts(Some(root.to_string()), path.to_string()))
    }

    /// The root path `/` under the default root
    pub fn root_path() -> Self {
        Self::from_parts(Some(DEFAULT_ROOT.to_string()), DEFAULT_ROOT.to_string())
    }

    /// Rebuild a rooted path from a full server-side address.
    ///
    /// `real` must lie under `root`; the root is stripped to recover the path
    /// component.
    pub fn from_real(root: &str, real: &str) -> Result<Self, PathError> {
        grammar::validate(root)?;
        grammar::validate(real)?;

        if root == DEFAULT_ROOT {
            return Self::with_root(root, real);
        }
        if real == root {
            return Ok(Self::from_parts(
                Some(root.to_string()),
                DEFAULT_ROOT.to_string(),
            ));
        }
        match real.strip_prefix(root) {
            Some(rest) if rest.starts_with(SEPARATOR) => {
                Ok(Self::from_parts(Some(root.to_string()), rest.to_string()))
            }
            _ => Err(PathError::MismatchedRoot {
                expected: root.to_string(),
                actual: real.to_string(),
            }),
        }
    }

    // Callers guarantee `path` is already valid for the given kind.
    fn from_parts(root: Option<String>, path: String) -> Self {
        let names = path
            .split(SEPARATOR)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { root, path, names }
    }

    /// The root suffix, or `None` for a relative path
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// The path component, relative to the root
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_absolute(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_relative(&self) -> bool {
        self.root.is_none()
    }

    /// True for the absolute path `/` (under any root)
    pub fn is_root(&self) -> bool {
        self.is_absolute() && self.names.is_empty()
    }

    /// The parent path with the same root.
    ///
    /// Relative paths and the root path have no parent.
    pub fn parent(&self) -> Option<Path> {
        let root = self.root.as_ref()?;
        if self.names.is_empty() {
            return None;
        }

        let cut = self.path.rfind(SEPARATOR)?;
        let parent = if cut == 0 {
            DEFAULT_ROOT
        } else {
            &self.path[..cut]
        };
        Some(Self::from_parts(Some(root.clone()), parent.to_string()))
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// The name at `index`, where index 0 is closest to the root
    pub fn name(&self, index: usize) -> Result<&str, PathError> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(PathError::NameIndexOutOfRange {
                index,
                count: self.names.len(),
            })
    }

    /// Iterate over the names from left to right
    pub fn names(&self) -> Names<'_> {
        Names {
            inner: self.names.iter(),
        }
    }

    /// The name farthest from the root
    pub fn last_name(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// Treat `other` as a child of this path.
    ///
    /// `/app1` resolved with `b/c` is `/app1/b/c` under the same root. Only
    /// absolute paths have children.
    pub fn resolve_child(&self, other: &Path) -> Result<Path, PathError> {
        if !self.is_absolute() {
            return Err(PathError::NotAbsolute(self.to_string()));
        }
        if other.is_absolute() {
            return Err(PathError::NotRelative(other.to_string()));
        }
        Ok(self.join(&other.path))
    }

    /// Parse `other` as a relative path and resolve it as a child
    pub fn resolve_child_str(&self, other: &str) -> Result<Path, PathError> {
        if other.starts_with(SEPARATOR) {
            return Err(PathError::NotRelative(other.to_string()));
        }
        self.resolve_child(&Path::new(other)?)
    }

    /// Treat `other` as a sibling of this path.
    ///
    /// Returns `Ok(None)` when this path has no parent.
    pub fn resolve_sibling(&self, other: &Path) -> Result<Option<Path>, PathError> {
        if other.is_absolute() {
            return Err(PathError::NotRelative(other.to_string()));
        }
        self.parent()
            .map(|parent| parent.resolve_child(other))
            .transpose()
    }

    /// Parse `other` as a relative path and resolve it as a sibling
    pub fn resolve_sibling_str(&self, other: &str) -> Result<Option<Path>, PathError> {
        if other.starts_with(SEPARATOR) {
            return Err(PathError::NotRelative(other.to_string()));
        }
        self.resolve_sibling(&Path::new(other)?)
    }

    /// The relative path that, resolved against this path, yields `other`.
    ///
    /// `/a/b` relativized against `/a/b/c/d` is `c/d`. Both paths must share
    /// a root and `other` must lie strictly below this path.
    pub fn relativize(&self, other: &Path) -> Result<Path, PathError> {
        if self.root != other.root {
            return Err(PathError::MismatchedRoot {
                expected: describe_root(self.root()),
                actual: describe_root(other.root()),
            });
        }

        let suffix = if self.is_root() {
            other.path.strip_prefix(SEPARATOR)
        } else {
            other
                .path
                .strip_prefix(self.path.as_str())
                .and_then(|rest| rest.strip_prefix(SEPARATOR))
        };

        match suffix {
            Some(rest) if !rest.is_empty() => Ok(Self::from_parts(None, rest.to_string())),
            _ => Err(PathError::NotAPrefix {
                base: self.to_string(),
                other: other.to_string(),
            }),
        }
    }

    /// Make this relative path absolute under the default root
    pub fn to_real_path(&self) -> Result<Path, PathError> {
        self.to_real_path_with_root(DEFAULT_ROOT)
    }

    /// Make this relative path absolute under the given root
    pub fn to_real_path_with_root(&self, root: &str) -> Result<Path, PathError> {
        if self.is_absolute() {
            return Err(PathError::AlreadyAbsolute(self.to_string()));
        }
        grammar::validate(root)?;
        Ok(Self::from_parts(
            Some(root.to_string()),
            format!("{}{}", SEPARATOR, self.path),
        ))
    }

    fn join(&self, relative: &str) -> Path {
        let path = if self.path == DEFAULT_ROOT {
            format!("{}{}", SEPARATOR, relative)
        } else {
            format!("{}{}{}", self.path, SEPARATOR, relative)
        };
        Self::from_parts(self.root.clone(), path)
    }
}

impl fmt::Display for Path {
    /// The full address: `root + path` for absolute paths (never doubling the
    /// separator), the bare path for relative ones.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root.as_deref() {
            None | Some(DEFAULT_ROOT) => f.write_str(&self.path),
            Some(root) if self.path == DEFAULT_ROOT => f.write_str(root),
            Some(root) => write!(f, "{}{}", root, self.path),
        }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::new(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Path::new(value)
    }
}

/// Iterator over the names of a [`Path`]
#[derive(Clone, Debug)]
pub struct Names<'a> {
    inner: std::slice::Iter<'a, String>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Names<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(String::as_str)
    }
}

impl ExactSizeIterator for Names<'_> {}

fn relabel(err: PathError, original: &str) -> PathError {
    match err {
        PathError::InvalidPath { reason, .. } => PathError::InvalidPath {
            path: original.to_string(),
            reason,
        },
        other => other,
    }
}

fn describe_root(root: Option<&str>) -> String {
    root.unwrap_or("(relative)").to_string()
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
