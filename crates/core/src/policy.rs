// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organization policy types and documents

use crate::id::PolicyName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of organization policy types managed by ADF.
///
/// Serializes with the provider's type name (`SERVICE_CONTROL_POLICY`,
/// `TAG_POLICY`); displays as the file-layout stem (`scp`, `tagging-policy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    #[serde(rename = "SERVICE_CONTROL_POLICY")]
    ServiceControl,
    #[serde(rename = "TAG_POLICY")]
    Tagging,
}

impl PolicyType {
    /// Every policy type, in the order a run processes them.
    pub const ALL: [PolicyType; 2] = [PolicyType::ServiceControl, PolicyType::Tagging];

    /// Directory name, legacy file stem, and parameter-store key.
    pub fn stem(&self) -> &'static str {
        match self {
            PolicyType::ServiceControl => "scp",
            PolicyType::Tagging => "tagging-policy",
        }
    }

    /// Type name as the organizations API spells it.
    pub fn provider_name(&self) -> &'static str {
        match self {
            PolicyType::ServiceControl => "SERVICE_CONTROL_POLICY",
            PolicyType::Tagging => "TAG_POLICY",
        }
    }

    /// File name used by the legacy `adf-bootstrap/**` layout.
    pub fn legacy_file_name(&self) -> String {
        format!("{}.json", self.stem())
    }

    /// Maximum size of a policy document, in characters of compact JSON.
    pub fn max_document_size(&self) -> usize {
        match self {
            PolicyType::ServiceControl => 5_120,
            PolicyType::Tagging => 10_000,
        }
    }

    /// Maximum number of policies of this type attached to a single target.
    pub fn max_policies_per_target(&self) -> usize {
        match self {
            PolicyType::ServiceControl => 5,
            PolicyType::Tagging => 10,
        }
    }

    /// Prefix of policy names derived from the legacy layout.
    pub fn name_prefix(&self) -> String {
        format!("adf-{}-", self.stem())
    }
}

crate::simple_display! {
    PolicyType {
        ServiceControl => "scp",
        Tagging => "tagging-policy",
    }
}

/// Error returned when a string names no known policy type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy type: {0}")]
pub struct UnknownPolicyType(pub String);

impl FromStr for PolicyType {
    type Err = UnknownPolicyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyType::ALL
            .into_iter()
            .find(|t| t.stem() == s || t.provider_name() == s)
            .ok_or_else(|| UnknownPolicyType(s.to_string()))
    }
}

/// Which file layout a document was loaded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "path", rename_all = "snake_case")]
pub enum PolicySource {
    /// `adf-bootstrap/**/<stem>.json`, targeting the directory it sits in
    Legacy(PathBuf),
    /// `adf-policies/<stem>/*.json`, a self-describing policy definition
    Definition(PathBuf),
}

impl PolicySource {
    pub fn path(&self) -> &Path {
        match self {
            PolicySource::Legacy(p) | PolicySource::Definition(p) => p,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, PolicySource::Legacy(_))
    }
}

impl fmt::Display for PolicySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicySource::Legacy(p) => write!(f, "legacy:{}", p.display()),
            PolicySource::Definition(p) => write!(f, "definition:{}", p.display()),
        }
    }
}

/// A policy loaded from disk: what to create and where to attach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub name: PolicyName,
    pub policy_type: PolicyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub body: serde_json::Value,
    /// Target paths as written by the author; resolved against the
    /// organization map at reconciliation time.
    pub targets: Vec<String>,
    pub source: PolicySource,
}

impl PolicyDocument {
    /// Compact JSON content submitted to the provider.
    pub fn content(&self) -> String {
        self.body.to_string()
    }
}

crate::builder! {
    pub struct PolicyDocumentBuilder => PolicyDocument {
        into {
            name: PolicyName = "adf-scp-test",
        }
        set {
            policy_type: PolicyType = PolicyType::ServiceControl,
            description: Option<String> = None,
            body: serde_json::Value = serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [{"Effect": "Deny", "Action": "s3:DeleteBucket", "Resource": "*"}]
            }),
            targets: Vec<String> = vec!["/".to_string()],
            source: PolicySource = PolicySource::Definition(PathBuf::from("test.json")),
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
