// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zkv-store: sessions and a key-value store over a coordination service

pub mod error;
pub mod session;
pub mod store;

pub use error::{SessionError, StoreError};
pub use session::CoordinationSession;
pub use store::ActiveKeyValueStore;
