// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration
//!
//! ```toml
//! connect = "127.0.0.1:2181,127.0.0.1:2182/app/a"
//! session_timeout = "30s"
//!
//! [retry]
//! max_retries = 3
//! retry_delay = "1s"
//! ```

use crate::path::{self, PathError, DEFAULT_ROOT};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path as FsPath;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Port used when a server address omits one
pub const DEFAULT_PORT: u16 = 2181;

/// Errors from loading client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid connect string {input:?}: {reason}")]
    InvalidConnectString { input: String, reason: String },
    #[error("invalid chroot in connect string: {0}")]
    InvalidChroot(#[from] PathError),
}

/// A single `host:port` server address
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Comma separated server list with an optional chroot suffix
///
/// `"10.0.0.1:2181,10.0.0.2:2181/app/a"` roots every path of the session at
/// `/app/a`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectString {
    servers: Vec<ServerAddr>,
    chroot: Option<String>,
}

impl ConnectString {
    pub fn servers(&self) -> &[ServerAddr] {
        &self.servers
    }

    /// The chroot suffix, if one was given
    pub fn chroot(&self) -> Option<&str> {
        self.chroot.as_deref()
    }

    /// The root that session paths are placed under
    pub fn root(&self) -> &str {
        self.chroot.as_deref().unwrap_or(DEFAULT_ROOT)
    }
}

impl FromStr for ConnectString {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidConnectString {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (hosts, chroot) = match input.find('/') {
            Some(index) => (&input[..index], Some(&input[index..])),
            None => (input, None),
        };

        let chroot = match chroot {
            Some(root) => {
                path::validate(root)?;
                // A chroot of "/" is no chroot at all
                (root != DEFAULT_ROOT).then(|| root.to_string())
            }
            None => None,
        };

        if hosts.trim().is_empty() {
            return Err(invalid("no servers"));
        }

        let mut servers = Vec::new();
        for entry in hosts.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(invalid("empty server address"));
            }
            let (host, port) = match entry.rsplit_once(':') {
                Some((host, port)) => {
                    let port = port
                        .parse::<u16>()
                        .map_err(|_| invalid(&format!("bad port in {:?}", entry)))?;
                    (host, port)
                }
                None => (entry, DEFAULT_PORT),
            };
            if host.is_empty() {
                return Err(invalid(&format!("missing host in {:?}", entry)));
            }
            servers.push(ServerAddr {
                host: host.to_string(),
                port,
            });
        }

        Ok(Self { servers, chroot })
    }
}

impl TryFrom<String> for ConnectString {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConnectString> for String {
    fn from(value: ConnectString) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ConnectString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let servers: Vec<String> = self.servers.iter().map(ToString::to_string).collect();
        write!(f, "{}", servers.join(","))?;
        if let Some(chroot) = &self.chroot {
            write!(f, "{}", chroot)?;
        }
        Ok(())
    }
}

/// Everything needed to open a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub connect: ConnectString,
    #[serde(with = "humantime_serde", default = "default_session_timeout")]
    pub session_timeout: Duration,
    /// Retry policy for transient failures; absent means no retries
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(30)
}

impl ClientConfig {
    pub fn new(connect: ConnectString) -> Self {
        Self {
            connect,
            session_timeout: default_session_timeout(),
            retry: None,
        }
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &FsPath) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
