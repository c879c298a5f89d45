// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::record::RecordError;
use adf_adapters::AdapterError;
use adf_core::PolicyName;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading policy files or the policy record
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("policy directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot search {}: {reason}", path.display())]
    Search { path: PathBuf, reason: String },
    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid policy definition {}: {reason}", path.display())]
    InvalidDefinition { path: PathBuf, reason: String },
    #[error("policy {name} defined twice: {} and {}", first.display(), second.display())]
    DuplicatePolicy { name: PolicyName, first: PathBuf, second: PathBuf },
    #[error("policy record '{key}': {source}")]
    Record {
        key: String,
        #[source]
        source: RecordError,
    },
    #[error("parameter store: {0}")]
    Adapter(#[from] AdapterError),
}
