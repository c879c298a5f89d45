// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors reported by cloud service adapters.
///
/// Adapters map provider exceptions onto these variants; callers only need
/// to distinguish transient responses from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("throttled: {0}")]
    Throttled(String),
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("policy in use: {0}")]
    PolicyInUse(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("malformed policy document: {0}")]
    MalformedPolicy(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("{0}")]
    Other(String),
}

impl AdapterError {
    /// Whether retrying the same call later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AdapterError::Throttled(_) | AdapterError::ConcurrentModification(_))
    }
}
