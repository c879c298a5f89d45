// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organization structure: feature set, tree nodes, and the path map

use crate::id::TargetId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Organization feature set. Policies require `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSet {
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "CONSOLIDATED_BILLING")]
    ConsolidatedBilling,
}

crate::simple_display! {
    FeatureSet {
        All => "ALL",
        ConsolidatedBilling => "CONSOLIDATED_BILLING",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    pub id: String,
    pub feature_set: FeatureSet,
}

/// A child of the organization tree: an organizational unit or an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgNode {
    pub id: TargetId,
    pub name: String,
}

impl OrgNode {
    pub fn new(id: impl Into<TargetId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Ordered path → target mapping for the whole organization.
///
/// Keys are `/` for the root, `/ou/child` for organizational units,
/// `/ou/account-name` for accounts, plus bare account names and bare account
/// ids. Built once per run and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationMap {
    entries: IndexMap<String, TargetId>,
}

impl OrganizationMap {
    pub const ROOT_PATH: &'static str = "/";

    /// Map containing only the root.
    pub fn with_root(root: impl Into<TargetId>) -> Self {
        let mut entries = IndexMap::new();
        entries.insert(Self::ROOT_PATH.to_string(), root.into());
        Self { entries }
    }

    /// Insert `key` unless it is already mapped. Returns `false` when an
    /// existing entry was kept.
    pub fn insert(&mut self, key: impl Into<String>, id: impl Into<TargetId>) -> bool {
        match self.entries.entry(key.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(id.into());
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TargetId> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<TargetId>> FromIterator<(K, V)> for OrganizationMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrganizationMap::default();
        for (key, id) in iter {
            map.insert(key, id);
        }
        map
    }
}

/// Path of the child `name` under `parent`.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent == OrganizationMap::ROOT_PATH {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
#[path = "organization_tests.rs"]
mod tests;
