// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy file layouts and policy-name derivation.
//!
//! Two layouts are read for each policy type:
//!
//! - definition: `<policies_dir>/<stem>/*.json`, each file a self-describing
//!   [`PolicyDefinition`] naming the policy and its targets
//! - legacy: `<bootstrap_dir>/**/<stem>.json`, a bare policy body that
//!   targets the directory it sits in and is named `adf-<stem>-<path>`

use crate::StoreError;
use adf_core::{OrganizationMap, PolicyDocument, PolicyName, PolicySource, PolicyType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Only schema version accepted for definition files
pub const DEFINITION_VERSION: &str = "2022-10-14";

/// Provider limit on policy name length
const MAX_NAME_LEN: usize = 128;

/// Target path of a legacy file, given its path relative to the bootstrap
/// root: `deployment/banking/scp.json` → `deployment/banking`, `scp.json` → `/`.
///
/// Returns `None` when the file is not a legacy file of `policy_type`.
pub fn legacy_target_path(relative: &Path, policy_type: PolicyType) -> Option<String> {
    let file_name = relative.file_name()?.to_str()?;
    if file_name != policy_type.legacy_file_name() {
        return None;
    }
    let mut segments = Vec::new();
    for component in relative.parent()?.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => segments.push(part.to_str()?),
            _ => return None,
        }
    }
    if segments.is_empty() {
        Some(OrganizationMap::ROOT_PATH.to_string())
    } else {
        Some(segments.join("/"))
    }
}

/// Policy name for a legacy target path: `adf-<stem>-<path>`
pub fn legacy_policy_name(policy_type: PolicyType, target_path: &str) -> PolicyName {
    PolicyName::new(format!("{}{target_path}", policy_type.name_prefix()))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(target) => vec![target],
            OneOrMany::Many(targets) => targets,
        }
    }
}

/// Definition-layout file contents
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PolicyDefinition {
    version: String,
    policy_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    targets: OneOrMany,
    policy: serde_json::Value,
}

impl PolicyDefinition {
    fn into_document(
        self,
        path: &Path,
        policy_type: PolicyType,
    ) -> Result<PolicyDocument, StoreError> {
        let invalid =
            |reason: String| StoreError::InvalidDefinition { path: path.to_path_buf(), reason };
        if self.version != DEFINITION_VERSION {
            return Err(invalid(format!(
                "unsupported Version '{}', expected '{DEFINITION_VERSION}'",
                self.version
            )));
        }
        if self.policy_name.trim().is_empty() || self.policy_name.len() > MAX_NAME_LEN {
            return Err(invalid(format!(
                "PolicyName must be 1 to {MAX_NAME_LEN} characters, got '{}'",
                self.policy_name
            )));
        }
        if !self.policy.is_object() {
            return Err(invalid("Policy must be a JSON object".to_string()));
        }
        Ok(PolicyDocument {
            name: PolicyName::new(self.policy_name),
            policy_type,
            description: self.description,
            body: self.policy,
            targets: self.targets.into_vec(),
            source: PolicySource::Definition(path.to_path_buf()),
        })
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value, StoreError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| StoreError::InvalidJson { path: path.to_path_buf(), source })
}

/// Files under `dir` matching the relative glob `pattern`, sorted.
///
/// Entries whose name starts with `.` are never matched by wildcards, so
/// hidden directories such as `.git` or `.backup` are not searched.
fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, StoreError> {
    let base = dir.to_str().ok_or_else(|| StoreError::Search {
        path: dir.to_path_buf(),
        reason: "path is not valid UTF-8".to_string(),
    })?;
    let full_pattern = format!("{}/{pattern}", glob::Pattern::escape(base.trim_end_matches('/')));
    let options =
        glob::MatchOptions { require_literal_leading_dot: true, ..glob::MatchOptions::new() };
    let entries = glob::glob_with(&full_pattern, options)
        .map_err(|e| StoreError::Search { path: dir.to_path_buf(), reason: e.to_string() })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StoreError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load definition-layout documents from `type_dir`, sorted by file path.
pub fn load_definitions(
    type_dir: &Path,
    policy_type: PolicyType,
) -> Result<Vec<PolicyDocument>, StoreError> {
    if !type_dir.is_dir() {
        return Err(StoreError::NotFound(type_dir.to_path_buf()));
    }
    let files = find_files(type_dir, "*.json")?;

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let raw = read_json(&path)?;
        let definition: PolicyDefinition = serde_json::from_value(raw).map_err(|e| {
            StoreError::InvalidDefinition { path: path.clone(), reason: e.to_string() }
        })?;
        let document = definition.into_document(&path, policy_type)?;
        tracing::debug!(policy = %document.name, path = %path.display(), "loaded policy definition");
        documents.push(document);
    }
    Ok(documents)
}

/// Load legacy-layout documents found anywhere under `bootstrap_dir`.
///
/// A missing bootstrap directory means no legacy policies.
pub fn load_legacy(
    bootstrap_dir: &Path,
    policy_type: PolicyType,
) -> Result<Vec<PolicyDocument>, StoreError> {
    if !bootstrap_dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = format!("**/{}", glob::Pattern::escape(&policy_type.legacy_file_name()));
    find_files(bootstrap_dir, &pattern)?
        .into_iter()
        .map(|path| legacy_document(bootstrap_dir, path, policy_type))
        .collect()
}

fn legacy_document(
    bootstrap_dir: &Path,
    path: PathBuf,
    policy_type: PolicyType,
) -> Result<PolicyDocument, StoreError> {
    let target = path
        .strip_prefix(bootstrap_dir)
        .ok()
        .and_then(|relative| legacy_target_path(relative, policy_type))
        .ok_or_else(|| StoreError::InvalidDefinition {
            path: path.clone(),
            reason: format!("no legacy target path under {}", bootstrap_dir.display()),
        })?;
    let body = read_json(&path)?;
    let name = legacy_policy_name(policy_type, &target);
    tracing::debug!(policy = %name, path = %path.display(), "loaded legacy policy");
    Ok(PolicyDocument {
        name,
        policy_type,
        description: None,
        body,
        targets: vec![target],
        source: PolicySource::Legacy(path),
    })
}

/// Reject two documents claiming the same policy name.
pub fn ensure_unique_names(documents: &[PolicyDocument]) -> Result<(), StoreError> {
    let mut seen: HashMap<&PolicyName, &Path> = HashMap::new();
    for document in documents {
        if let Some(first) = seen.insert(&document.name, document.source.path()) {
            return Err(StoreError::DuplicatePolicy {
                name: document.name.clone(),
                first: first.to_path_buf(),
                second: document.source.path().to_path_buf(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
