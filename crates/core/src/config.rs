// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration, constructed once at process start

use crate::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLICIES_DIR: &str = "./adf-policies";
pub const DEFAULT_BOOTSTRAP_DIR: &str = "./adf-bootstrap";
pub const DEFAULT_EVENT_BUS: &str = "ADF-Event-Bus";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AWS_REGION is not set")]
    MissingRegion,
}

/// Bounded exponential backoff for transient provider responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetrySettings {
    /// Delay before retry number `retry` (1-based): base doubled per retry,
    /// capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Configuration shared by reference with the reconciler and collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub region: String,
    pub policies_dir: PathBuf,
    pub bootstrap_dir: PathBuf,
    pub role_name: Option<String>,
    pub event_bus: String,
    pub trace_header: Option<String>,
    pub retry: RetrySettings,
}

impl Config {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            policies_dir: PathBuf::from(DEFAULT_POLICIES_DIR),
            bootstrap_dir: PathBuf::from(DEFAULT_BOOTSTRAP_DIR),
            role_name: None,
            event_bus: DEFAULT_EVENT_BUS.to_string(),
            trace_header: None,
            retry: RetrySettings::default(),
        }
    }

    /// Build from the process environment. Only the region is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let region = env::region().ok_or(ConfigError::MissingRegion)?;
        let defaults = RetrySettings::default();
        let mut config = Self::new(region).retry(RetrySettings {
            max_attempts: env::retry_max_attempts().unwrap_or(defaults.max_attempts),
            base_delay: env::retry_base_delay().unwrap_or(defaults.base_delay),
            max_delay: env::retry_max_delay().unwrap_or(defaults.max_delay),
        });
        if let Some(dir) = env::policies_dir() {
            config.policies_dir = dir;
        }
        if let Some(dir) = env::bootstrap_dir() {
            config.bootstrap_dir = dir;
        }
        if let Some(bus) = env::event_bus() {
            config.event_bus = bus;
        }
        config.role_name = env::role_name();
        config.trace_header = env::trace_header();
        Ok(config)
    }

    crate::setters! {
        into {
            policies_dir: PathBuf,
            bootstrap_dir: PathBuf,
            event_bus: String,
        }
        set {
            retry: RetrySettings,
        }
    }

    pub fn role_name(mut self, role: impl Into<String>) -> Self {
        self.role_name = Some(role.into());
        self
    }

    pub fn trace_header(mut self, header: impl Into<String>) -> Self {
        self.trace_header = Some(header.into());
        self
    }

    /// GovCloud partitions support service-control policies only.
    pub fn is_govcloud(&self) -> bool {
        self.region.starts_with("us-gov")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
