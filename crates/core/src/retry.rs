// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry of remote operations across connectivity loss
//!
//! An operation is attempted, and if it fails with a transient error it is
//! re-issued after `retry_delay`, at most `max_retries` times. Any other
//! error ends the loop at once and is handed back unchanged. The wait between
//! attempts can be interrupted through a [`CancellationToken`].
//!
//! The same closure is invoked on every attempt, so the operation must be
//! safe to re-issue.

use crate::clock::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that may or may not be worth retrying
pub trait Retryable {
    /// True if the outcome is unknown because the connection was lost
    fn is_transient(&self) -> bool;
}

/// Retry configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Wait before each retry
    #[serde(with = "humantime_serde", default = "default_retry_delay")]
    pub retry_delay: Duration,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(1)
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(default_max_retries(), default_retry_delay())
    }
}

/// Outcome of a failed [`RetryExecutor`] run
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The operation's own error: fatal, or transient with retries exhausted
    #[error(transparent)]
    Operation(E),
    /// The wait before a retry was cancelled
    #[error("{operation} interrupted after {attempts} failed attempts")]
    Interrupted {
        operation: &'static str,
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    pub fn into_operation(self) -> Option<E> {
        match self {
            RetryError::Operation(e) => Some(e),
            RetryError::Interrupted { .. } => None,
        }
    }
}

/// Runs operations under a [`RetryPolicy`]
///
/// Holds no per-call state; a single executor can be shared by concurrent
/// callers.
#[derive(Clone)]
pub struct RetryExecutor<C = SystemClock> {
    policy: RetryPolicy,
    clock: C,
}

impl RetryExecutor<SystemClock> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> RetryExecutor<C> {
    pub fn with_clock(policy: RetryPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails fatally, or runs out of retries
    pub async fn execute<T, E, F, Fut>(
        &self,
        operation: &'static str,
        op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        self.execute_until(operation, &CancellationToken::new(), op)
            .await
    }

    /// Like [`execute`](Self::execute), but a cancelled `cancel` aborts the
    /// wait before the next attempt with [`RetryError::Interrupted`]
    pub async fn execute_until<T, E, F, Fut>(
        &self,
        operation: &'static str,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        let mut retries = 0u32;
        let started = self.clock.now();

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(RetryError::Operation(err));
            }
            if retries >= self.policy.max_retries {
                tracing::warn!(
                    operation,
                    attempts = retries + 1,
                    elapsed_ms = self.clock.now().duration_since(started).as_millis() as u64,
                    error = %err,
                    "retries exhausted"
                );
                return Err(RetryError::Operation(err));
            }

            retries += 1;
            tracing::warn!(
                operation,
                retry = retries,
                max_retries = self.policy.max_retries,
                delay_ms = self.policy.retry_delay.as_millis() as u64,
                error = %err,
                "transient failure, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(
                        operation,
                        attempts = retries,
                        elapsed_ms = self.clock.now().duration_since(started).as_millis() as u64,
                        "retry wait interrupted"
                    );
                    return Err(RetryError::Interrupted {
                        operation,
                        attempts: retries,
                    });
                }
                _ = self.clock.sleep(self.policy.retry_delay) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
