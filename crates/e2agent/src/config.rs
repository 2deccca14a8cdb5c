// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Agent configuration.
//!
//! # Example
//!
//! ```
//! use e2agent::AgentConfig;
//! use std::time::Duration;
//!
//! let config = AgentConfig {
//!     ric_address: "10.0.2.10".to_string(),
//!     setup_retry_interval: Duration::from_millis(1500),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```
//!
//! With the `config-loaders` feature the same settings can be read from YAML:
//!
//! ```yaml
//! ric_address: 10.0.2.10
//! ric_port: 36421
//! setup_retry_interval_ms: 3000
//! node:
//!   node_type: gnb
//!   plmn: { mcc: 1, mnc: 1, mnc_digit_len: 2 }
//!   nb_id: 3584
//! ```

use std::time::Duration;

use crate::error::{Error, Result};

/// SCTP/TCP port registered for E2AP.
pub const E2AP_DEFAULT_PORT: u16 = 36421;

/// Interval between setup request resends while no response arrived.
pub const DEFAULT_SETUP_RETRY_INTERVAL: Duration = Duration::from_millis(3000);

/// Upper bound on a reactor wait, i.e. the stop-flag recheck latency.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Period at which the owning thread checks the stopped flag.
pub const DEFAULT_SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Lookups performed before an aperiodic request is declared unresolvable.
pub const DEFAULT_APERIODIC_LOOKUP_ATTEMPTS: u32 = 10;

/// Sleep between two aperiodic lookups.
pub const DEFAULT_APERIODIC_LOOKUP_BACKOFF: Duration = Duration::from_micros(10);

/// Default maximum PDU size (16 MB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Agent configuration.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    // === Controller ===
    /// RIC host name or address
    pub ric_address: String,

    /// RIC E2 port
    pub ric_port: u16,

    /// Timeout for the initial connection (also bounds a blocked write)
    pub connect_timeout: Duration,

    /// Enable TCP_NODELAY
    pub nodelay: bool,

    /// Maximum accepted PDU size in bytes
    pub max_message_size: usize,

    // === Reactor ===
    /// Setup request resend interval
    pub setup_retry_interval: Duration,

    /// Longest single wait before the stop flag is checked again
    pub poll_timeout: Duration,

    /// Readiness events fetched per poll
    pub max_events: usize,

    // === Shutdown / producers ===
    /// Stopped-flag polling period used by `await_termination`
    pub shutdown_poll_interval: Duration,

    /// Registry lookups for a just-created subscription
    pub aperiodic_lookup_attempts: u32,

    /// Pause between two such lookups (lock released meanwhile)
    pub aperiodic_lookup_backoff: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ric_address: "127.0.0.1".to_string(),
            ric_port: E2AP_DEFAULT_PORT,
            connect_timeout: Duration::from_secs(5),
            nodelay: true,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,

            setup_retry_interval: DEFAULT_SETUP_RETRY_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            max_events: crate::rt::DEFAULT_MAX_EVENTS,

            shutdown_poll_interval: DEFAULT_SHUTDOWN_POLL_INTERVAL,
            aperiodic_lookup_attempts: DEFAULT_APERIODIC_LOOKUP_ATTEMPTS,
            aperiodic_lookup_backoff: DEFAULT_APERIODIC_LOOKUP_BACKOFF,
        }
    }
}

impl AgentConfig {
    /// Builder: set the RIC endpoint
    pub fn with_ric(mut self, address: impl Into<String>, port: u16) -> Self {
        self.ric_address = address.into();
        self.ric_port = port;
        self
    }

    /// Builder: set the setup resend interval
    pub fn with_setup_retry_interval(mut self, interval: Duration) -> Self {
        self.setup_retry_interval = interval;
        self
    }

    /// Builder: set the reactor wait bound
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Total time a producer may wait for a subscription to become visible.
    pub fn aperiodic_lookup_budget(&self) -> Duration {
        self.aperiodic_lookup_backoff * self.aperiodic_lookup_attempts
    }

    /// Reject values the reactor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ric_address.is_empty() {
            return Err(Error::Config("ric_address must not be empty".into()));
        }
        if self.max_message_size == 0 {
            return Err(Error::Config("max_message_size must be > 0".into()));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::Config("connect_timeout must be > 0".into()));
        }
        if self.setup_retry_interval.is_zero() {
            return Err(Error::Config("setup_retry_interval must be > 0".into()));
        }
        if self.poll_timeout.is_zero() {
            return Err(Error::Config("poll_timeout must be > 0".into()));
        }
        if self.shutdown_poll_interval.is_zero() {
            return Err(Error::Config("shutdown_poll_interval must be > 0".into()));
        }
        if self.aperiodic_lookup_attempts == 0 {
            return Err(Error::Config("aperiodic_lookup_attempts must be > 0".into()));
        }
        if self.max_events == 0 {
            return Err(Error::Config("max_events must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(feature = "config-loaders")]
pub use loader::AgentConfigDocument;

#[cfg(feature = "config-loaders")]
mod loader {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use serde::Deserialize;

    use super::AgentConfig;
    use crate::e2ap::GlobalNodeId;
    use crate::error::{Error, Result};

    /// Root YAML document.
    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct AgentConfigDocument {
        pub ric_address: Option<String>,
        pub ric_port: Option<u16>,
        pub connect_timeout_ms: Option<u64>,
        pub nodelay: Option<bool>,
        pub max_message_size: Option<usize>,
        pub setup_retry_interval_ms: Option<u64>,
        pub poll_timeout_ms: Option<u64>,
        pub max_events: Option<usize>,
        pub shutdown_poll_interval_ms: Option<u64>,
        pub aperiodic_lookup_attempts: Option<u32>,
        pub aperiodic_lookup_backoff_us: Option<u64>,

        /// Identity advertised in the setup request.
        pub node: Option<GlobalNodeId>,
    }

    impl AgentConfigDocument {
        /// Overlay the document on the defaults and validate the result.
        pub fn to_config(&self) -> Result<AgentConfig> {
            let mut config = AgentConfig::default();
            if let Some(v) = &self.ric_address {
                config.ric_address = v.clone();
            }
            if let Some(v) = self.ric_port {
                config.ric_port = v;
            }
            if let Some(v) = self.connect_timeout_ms {
                config.connect_timeout = Duration::from_millis(v);
            }
            if let Some(v) = self.nodelay {
                config.nodelay = v;
            }
            if let Some(v) = self.max_message_size {
                config.max_message_size = v;
            }
            if let Some(v) = self.setup_retry_interval_ms {
                config.setup_retry_interval = Duration::from_millis(v);
            }
            if let Some(v) = self.poll_timeout_ms {
                config.poll_timeout = Duration::from_millis(v);
            }
            if let Some(v) = self.max_events {
                config.max_events = v;
            }
            if let Some(v) = self.shutdown_poll_interval_ms {
                config.shutdown_poll_interval = Duration::from_millis(v);
            }
            if let Some(v) = self.aperiodic_lookup_attempts {
                config.aperiodic_lookup_attempts = v;
            }
            if let Some(v) = self.aperiodic_lookup_backoff_us {
                config.aperiodic_lookup_backoff = Duration::from_micros(v);
            }
            config.validate()?;
            Ok(config)
        }
    }

    impl AgentConfig {
        /// Parse a YAML document.
        pub fn parse_yaml(yaml: &str) -> Result<AgentConfigDocument> {
            serde_yaml::from_str(yaml)
                .map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))
        }

        /// Build a configuration from YAML text.
        pub fn from_yaml_str(yaml: &str) -> Result<AgentConfig> {
            Self::parse_yaml(yaml)?.to_config()
        }

        /// Read a YAML file. Returns the configuration and the optional node id.
        pub fn load_from_file<P: AsRef<Path>>(
            path: P,
        ) -> Result<(AgentConfig, Option<GlobalNodeId>)> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| {
                Error::Config(format!(
                    "Failed to read {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?;
            let doc = Self::parse_yaml(&content)?;
            let config = doc.to_config()?;
            Ok((config, doc.node))
        }
    }
}
