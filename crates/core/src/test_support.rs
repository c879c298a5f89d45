// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{OrganizationMap, PolicyDocument, PolicyName, PolicySource, PolicyType};
use std::path::PathBuf;

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::PolicyType;
    use proptest::prelude::*;

    pub fn arb_policy_type() -> impl Strategy<Value = PolicyType> {
        prop_oneof![Just(PolicyType::ServiceControl), Just(PolicyType::Tagging)]
    }

    /// Relative OU path of one to three segments, e.g. `deployment/banking`.
    pub fn arb_ou_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z][a-z0-9-]{0,11}", 1..=3).prop_map(|parts| parts.join("/"))
    }
}

// ── Document factories ──────────────────────────────────────────────────

/// Legacy-layout service-control document targeting `path`.
pub fn legacy_scp(path: &str) -> PolicyDocument {
    PolicyDocument::builder()
        .name(format!("adf-scp-{path}"))
        .targets(vec![path.to_string()])
        .source(PolicySource::Legacy(PathBuf::from(format!("{path}/scp.json"))))
        .build()
}

/// Definition-layout document of `policy_type` attached to `targets`.
pub fn definition(name: &str, policy_type: PolicyType, targets: &[&str]) -> PolicyDocument {
    PolicyDocument::builder()
        .name(PolicyName::new(name))
        .policy_type(policy_type)
        .targets(targets.iter().map(|t| t.to_string()).collect())
        .source(PolicySource::Definition(PathBuf::from(format!("{name}.json"))))
        .build()
}

/// Organization with one OU per `(path, id)` pair under root `r-root`.
pub fn org_map(entries: &[(&str, &str)]) -> OrganizationMap {
    let mut map = OrganizationMap::with_root("r-root");
    for (path, id) in entries {
        map.insert(*path, *id);
    }
    map
}
