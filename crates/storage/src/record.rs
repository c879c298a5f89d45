// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned policy record persisted between runs.
//!
//! Current format (v1) is JSON: `{"v":1,"policies":["adf-scp-a","adf-scp-b"]}`
//! with names sorted. Records written before versioning hold a quoted list of
//! legacy file paths (`['./deployment/scp.json']`); those are read and
//! converted to policy names but never written.

use crate::layout::{legacy_policy_name, legacy_target_path};
use adf_core::{PolicyName, PolicyType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record version {0} is newer than supported version {RECORD_VERSION}")]
    TooNew(u32),
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("cannot encode record: {0}")]
    Encode(String),
    #[error("legacy record entry '{0}' is not a policy file path")]
    LegacyEntry(String),
}

#[derive(Serialize, Deserialize)]
struct StoredRecord<P> {
    v: u32,
    policies: P,
}

/// Set of policy names applied by the last successful run of one type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyRecord {
    policies: BTreeSet<PolicyName>,
}

impl PolicyRecord {
    pub fn new(policies: BTreeSet<PolicyName>) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &BTreeSet<PolicyName> {
        &self.policies
    }

    pub fn into_policies(self) -> BTreeSet<PolicyName> {
        self.policies
    }

    pub fn encode(&self) -> Result<String, RecordError> {
        let stored = StoredRecord { v: RECORD_VERSION, policies: &self.policies };
        serde_json::to_string(&stored).map_err(|e| RecordError::Encode(e.to_string()))
    }

    /// Decode a stored record. Legacy entries are file paths and need the
    /// policy type to become names.
    pub fn decode(raw: &str, policy_type: PolicyType) -> Result<Self, RecordError> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            let stored: StoredRecord<Vec<PolicyName>> =
                serde_json::from_str(trimmed).map_err(|e| RecordError::Malformed(e.to_string()))?;
            return match stored.v {
                RECORD_VERSION => Ok(Self::new(stored.policies.into_iter().collect())),
                v if v > RECORD_VERSION => Err(RecordError::TooNew(v)),
                v => Err(RecordError::Malformed(format!("unknown version {v}"))),
            };
        }
        if trimmed.starts_with('[') {
            let mut policies = BTreeSet::new();
            for entry in parse_legacy_list(trimmed)? {
                let relative = entry.strip_prefix("./").unwrap_or(&entry);
                let target = legacy_target_path(Path::new(relative), policy_type)
                    .ok_or_else(|| RecordError::LegacyEntry(entry.clone()))?;
                policies.insert(legacy_policy_name(policy_type, &target));
            }
            tracing::info!(%policy_type, count = policies.len(), "read legacy policy record");
            return Ok(Self::new(policies));
        }
        Err(RecordError::Malformed(format!("unrecognized record: {trimmed:.40}")))
    }
}

/// Parse a bracketed list of single- or double-quoted strings.
fn parse_legacy_list(raw: &str) -> Result<Vec<String>, RecordError> {
    let malformed = |why: String| RecordError::Malformed(format!("legacy list: {why}"));
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| malformed("expected [...]".to_string()))?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(malformed(format!("unexpected '{c}'"))),
        };
        let mut item = String::new();
        loop {
            match chars.next() {
                None => return Err(malformed("unterminated string".to_string())),
                Some('\\') => match chars.next() {
                    Some(c) => item.push(c),
                    None => return Err(malformed("dangling escape".to_string())),
                },
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
            }
        }
        items.push(item);
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(c) => return Err(malformed(format!("unexpected '{c}' after item"))),
        }
    }
    Ok(items)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
