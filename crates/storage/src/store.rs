// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Policy store: documents on disk, applied set in the parameter store

use crate::layout::{ensure_unique_names, load_definitions, load_legacy};
use crate::record::PolicyRecord;
use crate::StoreError;
use adf_adapters::ParameterStoreAdapter;
use adf_core::{Config, PolicyDocument, PolicyName, PolicyType};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub struct PolicyStore<P> {
    params: P,
    policies_dir: PathBuf,
    bootstrap_dir: PathBuf,
}

impl<P: ParameterStoreAdapter> PolicyStore<P> {
    pub fn new(params: P, config: &Config) -> Self {
        Self {
            params,
            policies_dir: config.policies_dir.clone(),
            bootstrap_dir: config.bootstrap_dir.clone(),
        }
    }

    /// Load every document of `policy_type`: legacy layout first, then
    /// definitions from `<policies_dir>/<stem>/`.
    ///
    /// Fails with [`StoreError::NotFound`] when the type directory is missing.
    pub fn load_file_system_policies(
        &self,
        policy_type: PolicyType,
    ) -> Result<Vec<PolicyDocument>, StoreError> {
        let mut documents = load_legacy(&self.bootstrap_dir, policy_type)?;
        tracing::info!(
            %policy_type,
            policies = ?documents.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "discovered legacy policies"
        );
        let definitions = load_definitions(&self.policies_dir.join(policy_type.stem()), policy_type)?;
        tracing::info!(
            %policy_type,
            policies = ?definitions.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "discovered policy definitions"
        );
        documents.extend(definitions);
        ensure_unique_names(&documents)?;
        Ok(documents)
    }

    /// Names applied by the last successful run. No record yet is an empty set.
    pub async fn load_previous_policy_set(
        &self,
        policy_type: PolicyType,
    ) -> Result<BTreeSet<PolicyName>, StoreError> {
        let key = policy_type.stem();
        let Some(raw) = self.params.get_parameter(key).await? else {
            tracing::debug!(%policy_type, key, "no policy record yet, starting from empty set");
            return Ok(BTreeSet::new());
        };
        let record = PolicyRecord::decode(&raw, policy_type)
            .map_err(|source| StoreError::Record { key: key.to_string(), source })?;
        Ok(record.into_policies())
    }

    /// Overwrite the record for `policy_type`
    pub async fn save_policy_set(
        &self,
        policy_type: PolicyType,
        policies: &BTreeSet<PolicyName>,
    ) -> Result<(), StoreError> {
        let key = policy_type.stem();
        let encoded = PolicyRecord::new(policies.clone())
            .encode()
            .map_err(|source| StoreError::Record { key: key.to_string(), source })?;
        self.params.put_parameter(key, &encoded).await?;
        tracing::info!(%policy_type, count = policies.len(), "saved policy record");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
