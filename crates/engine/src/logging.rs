// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber setup for host processes

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "ADF_LOG";

const DEFAULT_FILTER: &str = "info";

/// Filter from `ADF_LOG`, falling back to `info` when unset or unparsable
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global fmt subscriber filtered by `ADF_LOG` (default `info`).
///
/// Fails if a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).with_target(false).try_init()
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
