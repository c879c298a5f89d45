// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Read only by [`Config::from_env`](crate::Config::from_env); nothing else in
//! the workspace touches the process environment.

use std::path::PathBuf;
use std::time::Duration;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

fn millis(var: &str) -> Option<Duration> {
    non_empty(var).and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Region the run operates in (`AWS_REGION`).
pub fn region() -> Option<String> {
    non_empty("AWS_REGION")
}

/// Root of the definition-layout policy files (`ADF_POLICIES_DIR`).
pub fn policies_dir() -> Option<PathBuf> {
    non_empty("ADF_POLICIES_DIR").map(PathBuf::from)
}

/// Root of the legacy bootstrap layout (`ADF_BOOTSTRAP_DIR`).
pub fn bootstrap_dir() -> Option<PathBuf> {
    non_empty("ADF_BOOTSTRAP_DIR").map(PathBuf::from)
}

/// Cross-account role assumed in member accounts (`ADF_ROLE_NAME`).
pub fn role_name() -> Option<String> {
    non_empty("ADF_ROLE_NAME")
}

/// Event bus receiving lifecycle events (`ADF_EVENTBUS_ARN`).
pub fn event_bus() -> Option<String> {
    non_empty("ADF_EVENTBUS_ARN")
}

/// Trace header propagated onto emitted events (`_X_AMZN_TRACE_ID`).
pub fn trace_header() -> Option<String> {
    non_empty("_X_AMZN_TRACE_ID")
}

/// Attempts per remote call before a throttled call is fatal.
pub fn retry_max_attempts() -> Option<u32> {
    non_empty("ADF_RETRY_MAX_ATTEMPTS").and_then(|s| s.parse::<u32>().ok()).filter(|n| *n > 0)
}

/// Delay before the first retry (`ADF_RETRY_BASE_DELAY_MS`).
pub fn retry_base_delay() -> Option<Duration> {
    millis("ADF_RETRY_BASE_DELAY_MS")
}

/// Upper bound on a single retry delay (`ADF_RETRY_MAX_DELAY_MS`).
pub fn retry_max_delay() -> Option<Duration> {
    millis("ADF_RETRY_MAX_DELAY_MS")
}
