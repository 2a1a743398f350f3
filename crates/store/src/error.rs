// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session and store error types

use thiserror::Error;
use zkv_adapters::CoordinatorError;
use zkv_core::{PathError, RetryError};

/// Errors from [`CoordinationSession`](crate::CoordinationSession) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("path must be absolute: {0}")]
    RelativePath(String),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Remote(#[from] CoordinatorError),
    #[error("{operation} interrupted after {attempts} failed attempts")]
    Interrupted {
        operation: &'static str,
        attempts: u32,
    },
}

impl SessionError {
    /// The remote error, if this failure came from the coordination service
    pub fn remote(&self) -> Option<&CoordinatorError> {
        match self {
            SessionError::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RetryError<CoordinatorError>> for SessionError {
    fn from(err: RetryError<CoordinatorError>) -> Self {
        match err {
            RetryError::Operation(e) => SessionError::Remote(e),
            RetryError::Interrupted {
                operation,
                attempts,
            } => SessionError::Interrupted {
                operation,
                attempts,
            },
        }
    }
}

/// Errors from [`ActiveKeyValueStore`](crate::ActiveKeyValueStore) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("key must not be empty")]
    EmptyKey,
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("key already exists: {0}")]
    DuplicateKey(String),
    #[error("no such key: {0}")]
    NoSuchKey(String),
    #[error("version conflict on {key}: expected {expected}, found {actual}")]
    VersionConflict {
        key: String,
        expected: i32,
        actual: i32,
    },
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    #[error(transparent)]
    Session(#[from] SessionError),
}
