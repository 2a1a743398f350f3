// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zkv-core: Client-side building blocks for a hierarchical coordination service
//!
//! This crate provides:
//! - Node paths with chroot support, derivation, and sequence-id ordering
//! - Node attributes (ACLs, create modes, version preconditions, metadata)
//! - A bounded retry executor that separates transient from fatal failures
//! - Client configuration loaded from TOML

pub mod clock;
pub mod config;
pub mod node;
pub mod path;
pub mod retry;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ClientConfig, ConfigError, ConnectString, ServerAddr};
pub use node::{Acl, AclEntry, AclScheme, CreateMode, ExpectedVersion, NodeStat, Permissions};
pub use path::{Path, PathError};
pub use retry::{RetryError, RetryExecutor, RetryPolicy, Retryable};
