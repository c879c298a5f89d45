// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organization tree map and policy target resolution

use crate::retry::{with_retry, CallError};
use adf_adapters::OrganizationsAdapter;
use adf_core::{child_path, OrganizationMap, RetrySettings, TargetId};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("target '{0}' does not exist in the organization")]
    TargetNotFound(String),
}

/// Walk the organization breadth-first from `root` and record every
/// organizational unit and account under its path.
///
/// Accounts are also reachable by bare name and bare id. When two children
/// produce the same key the first one visited is kept.
pub async fn build_tree_map<O: OrganizationsAdapter>(
    org: &O,
    root: &TargetId,
    retry: &RetrySettings,
) -> Result<OrganizationMap, CallError> {
    let mut map = OrganizationMap::with_root(root.clone());
    let mut queue = VecDeque::from([(OrganizationMap::ROOT_PATH.to_string(), root.clone())]);

    while let Some((path, parent)) = queue.pop_front() {
        let units = with_retry(retry, format!("list organizational units of {parent}"), || {
            org.list_organizational_units(&parent)
        })
        .await?;
        for ou in units {
            let ou_path = child_path(&path, &ou.name);
            if !map.insert(ou_path.clone(), ou.id.clone()) {
                tracing::warn!(path = %ou_path, ou = %ou.id, "duplicate organization path, keeping first");
                continue;
            }
            queue.push_back((ou_path, ou.id));
        }

        let accounts = with_retry(retry, format!("list accounts of {parent}"), || {
            org.list_accounts(&parent)
        })
        .await?;
        for account in accounts {
            map.insert(child_path(&path, &account.name), account.id.clone());
            if !map.insert(account.name.clone(), account.id.clone()) {
                tracing::debug!(name = %account.name, account = %account.id, "account name already mapped");
            }
            map.insert(account.id.to_string(), account.id);
        }
    }

    tracing::debug!(entries = map.len(), "built organization tree map");
    Ok(map)
}

/// Read-only lookup of policy target paths.
#[derive(Debug, Clone, Copy)]
pub struct TargetResolver<'a> {
    map: &'a OrganizationMap,
}

impl<'a> TargetResolver<'a> {
    pub fn new(map: &'a OrganizationMap) -> Self {
        Self { map }
    }

    /// Resolve a target path to its provider id.
    ///
    /// `""` and `"/"` are the root. A trailing slash is ignored. A key
    /// without a leading slash is tried as an OU path first, then as a
    /// bare account name or id.
    pub fn resolve_target(&self, path: &str) -> Result<TargetId, ResolveError> {
        let trimmed = path.trim();
        let key = match trimmed.trim_end_matches('/') {
            "" => OrganizationMap::ROOT_PATH,
            key => key,
        };

        let found = if key.starts_with('/') {
            self.map.get(key)
        } else {
            self.map.get(&format!("/{key}")).or_else(|| self.map.get(key))
        };

        found.cloned().ok_or_else(|| ResolveError::TargetNotFound(path.to_string()))
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
