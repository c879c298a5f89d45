// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded exponential backoff around provider calls

use adf_adapters::AdapterError;
use adf_core::RetrySettings;
use std::future::Future;
use thiserror::Error;

/// A provider call that did not succeed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("{call}: still throttled after {attempts} attempts: {source}")]
    Exhausted {
        call: String,
        attempts: u32,
        #[source]
        source: AdapterError,
    },
    #[error("{call}: {source}")]
    Rejected {
        call: String,
        #[source]
        source: AdapterError,
    },
}

/// Run `call`, retrying transient failures up to `settings.max_attempts`.
///
/// Non-transient failures are returned immediately.
pub async fn with_retry<T, F, Fut>(
    settings: &RetrySettings,
    label: impl std::fmt::Display,
    mut call: F,
) -> Result<T, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdapterError>>,
{
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < settings.max_attempts => {
                let delay = settings.delay_for(attempt);
                tracing::warn!(
                    call = %label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient provider error, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) if e.is_transient() => {
                return Err(CallError::Exhausted {
                    call: label.to_string(),
                    attempts: attempt,
                    source: e,
                })
            }
            Err(e) => return Err(CallError::Rejected { call: label.to_string(), source: e }),
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
