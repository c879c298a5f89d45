// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organizations service adapter

use crate::AdapterError;
use adf_core::{OrgNode, OrganizationInfo, PolicyId, PolicyName, PolicyType, TargetId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A policy as listed by the organizations service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub id: PolicyId,
    pub name: PolicyName,
    pub policy_type: PolicyType,
    /// Provider-owned policies (e.g. `FullAWSAccess`) are never modified
    pub aws_managed: bool,
}

/// Parameters for creating a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolicy<'a> {
    pub name: &'a PolicyName,
    pub description: &'a str,
    pub policy_type: PolicyType,
    pub content: &'a str,
}

/// Adapter for the organizations service.
///
/// Methods map one-to-one onto provider calls; pagination is the adapter's
/// concern and every `list_*` returns the complete result.
#[async_trait]
pub trait OrganizationsAdapter: Clone + Send + Sync + 'static {
    async fn describe_organization(&self) -> Result<OrganizationInfo, AdapterError>;

    /// Enable a policy type on the root. Already enabled is not an error.
    async fn enable_policy_type(&self, policy_type: PolicyType) -> Result<(), AdapterError>;

    async fn root_id(&self) -> Result<TargetId, AdapterError>;

    async fn list_organizational_units(
        &self,
        parent: &TargetId,
    ) -> Result<Vec<OrgNode>, AdapterError>;

    async fn list_accounts(&self, parent: &TargetId) -> Result<Vec<OrgNode>, AdapterError>;

    async fn list_policies(
        &self,
        policy_type: PolicyType,
    ) -> Result<Vec<PolicySummary>, AdapterError>;

    async fn list_policies_for_target(
        &self,
        target: &TargetId,
        policy_type: PolicyType,
    ) -> Result<Vec<PolicySummary>, AdapterError>;

    async fn list_targets_for_policy(&self, policy: &PolicyId)
        -> Result<Vec<TargetId>, AdapterError>;

    async fn create_policy(&self, policy: NewPolicy<'_>) -> Result<PolicyId, AdapterError>;

    async fn update_policy(&self, policy: &PolicyId, content: &str) -> Result<(), AdapterError>;

    async fn attach_policy(&self, policy: &PolicyId, target: &TargetId)
        -> Result<(), AdapterError>;

    async fn detach_policy(&self, policy: &PolicyId, target: &TargetId)
        -> Result<(), AdapterError>;

    /// Delete a policy. The provider rejects deleting an attached policy.
    async fn delete_policy(&self, policy: &PolicyId) -> Result<(), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NewPolicy, OrganizationsAdapter, PolicySummary};
    use crate::AdapterError;
    use adf_core::{
        FeatureSet, OrgNode, OrganizationInfo, PolicyId, PolicyName, PolicyType, TargetId,
    };
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded call against the fake organizations service
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum OrgCall {
        DescribeOrganization,
        EnablePolicyType(PolicyType),
        RootId,
        ListOrganizationalUnits(TargetId),
        ListAccounts(TargetId),
        ListPolicies(PolicyType),
        ListPoliciesForTarget(TargetId),
        ListTargetsForPolicy(PolicyId),
        CreatePolicy { name: PolicyName },
        UpdatePolicy { policy: PolicyId },
        AttachPolicy { policy: PolicyId, target: TargetId },
        DetachPolicy { policy: PolicyId, target: TargetId },
        DeletePolicy { policy: PolicyId },
    }

    /// Call discriminant, used to script failures
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum OrgCallKind {
        DescribeOrganization,
        EnablePolicyType,
        RootId,
        ListOrganizationalUnits,
        ListAccounts,
        ListPolicies,
        ListPoliciesForTarget,
        ListTargetsForPolicy,
        CreatePolicy,
        UpdatePolicy,
        AttachPolicy,
        DetachPolicy,
        DeletePolicy,
    }

    impl OrgCall {
        pub fn kind(&self) -> OrgCallKind {
            match self {
                OrgCall::DescribeOrganization => OrgCallKind::DescribeOrganization,
                OrgCall::EnablePolicyType(_) => OrgCallKind::EnablePolicyType,
                OrgCall::RootId => OrgCallKind::RootId,
                OrgCall::ListOrganizationalUnits(_) => OrgCallKind::ListOrganizationalUnits,
                OrgCall::ListAccounts(_) => OrgCallKind::ListAccounts,
                OrgCall::ListPolicies(_) => OrgCallKind::ListPolicies,
                OrgCall::ListPoliciesForTarget(_) => OrgCallKind::ListPoliciesForTarget,
                OrgCall::ListTargetsForPolicy(_) => OrgCallKind::ListTargetsForPolicy,
                OrgCall::CreatePolicy { .. } => OrgCallKind::CreatePolicy,
                OrgCall::UpdatePolicy { .. } => OrgCallKind::UpdatePolicy,
                OrgCall::AttachPolicy { .. } => OrgCallKind::AttachPolicy,
                OrgCall::DetachPolicy { .. } => OrgCallKind::DetachPolicy,
                OrgCall::DeletePolicy { .. } => OrgCallKind::DeletePolicy,
            }
        }

        /// Whether the call changes provider state
        pub fn is_mutation(&self) -> bool {
            matches!(
                self,
                OrgCall::EnablePolicyType(_)
                    | OrgCall::CreatePolicy { .. }
                    | OrgCall::UpdatePolicy { .. }
                    | OrgCall::AttachPolicy { .. }
                    | OrgCall::DetachPolicy { .. }
                    | OrgCall::DeletePolicy { .. }
            )
        }
    }

    /// Policy held by the fake service
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FakePolicy {
        pub id: PolicyId,
        pub name: PolicyName,
        pub policy_type: PolicyType,
        pub description: String,
        pub content: String,
        pub aws_managed: bool,
    }

    impl FakePolicy {
        fn summary(&self) -> PolicySummary {
            PolicySummary {
                id: self.id.clone(),
                name: self.name.clone(),
                policy_type: self.policy_type,
                aws_managed: self.aws_managed,
            }
        }
    }

    struct ScriptedFailure {
        kind: OrgCallKind,
        error: AdapterError,
        remaining: u32,
    }

    struct FakeOrgState {
        info: OrganizationInfo,
        root: TargetId,
        ous: HashMap<TargetId, Vec<OrgNode>>,
        accounts: HashMap<TargetId, Vec<OrgNode>>,
        enabled: Vec<PolicyType>,
        policies: IndexMap<PolicyId, FakePolicy>,
        attachments: Vec<(PolicyId, TargetId)>,
        next_id: u32,
        calls: Vec<OrgCall>,
        failures: Vec<ScriptedFailure>,
    }

    impl FakeOrgState {
        fn record(&mut self, call: OrgCall) -> Result<(), AdapterError> {
            let kind = call.kind();
            self.calls.push(call);
            if let Some(failure) =
                self.failures.iter_mut().find(|f| f.kind == kind && f.remaining > 0)
            {
                failure.remaining -= 1;
                return Err(failure.error.clone());
            }
            Ok(())
        }

        fn policy(&self, id: &PolicyId) -> Result<&FakePolicy, AdapterError> {
            self.policies.get(id).ok_or_else(|| AdapterError::NotFound(id.to_string()))
        }

        fn insert_policy(
            &mut self,
            name: &PolicyName,
            policy_type: PolicyType,
            description: &str,
            content: &str,
            aws_managed: bool,
        ) -> PolicyId {
            self.next_id += 1;
            let id = PolicyId::new(format!("p-{:08}", self.next_id));
            self.policies.insert(
                id.clone(),
                FakePolicy {
                    id: id.clone(),
                    name: name.clone(),
                    policy_type,
                    description: description.to_string(),
                    content: content.to_string(),
                    aws_managed,
                },
            );
            id
        }

        fn attached_count(&self, target: &TargetId, policy_type: PolicyType) -> usize {
            self.attachments
                .iter()
                .filter(|(p, t)| {
                    t == target && self.policies.get(p).is_some_and(|p| p.policy_type == policy_type)
                })
                .count()
        }
    }

    /// In-memory organizations service.
    ///
    /// Enforces the provider rules the reconciler depends on: per-target
    /// attachment ceilings, no deleting attached policies, no duplicate names
    /// or attachments.
    #[derive(Clone)]
    pub struct FakeOrganizationsAdapter {
        inner: Arc<Mutex<FakeOrgState>>,
    }

    impl Default for FakeOrganizationsAdapter {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeOrgState {
                    info: OrganizationInfo {
                        id: "o-fake".to_string(),
                        feature_set: FeatureSet::All,
                    },
                    root: TargetId::new("r-root"),
                    ous: HashMap::new(),
                    accounts: HashMap::new(),
                    enabled: Vec::new(),
                    policies: IndexMap::new(),
                    attachments: Vec::new(),
                    next_id: 0,
                    calls: Vec::new(),
                    failures: Vec::new(),
                })),
            }
        }
    }

    impl FakeOrganizationsAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_feature_set(&self, feature_set: FeatureSet) {
            self.inner.lock().info.feature_set = feature_set;
        }

        pub fn root(&self) -> TargetId {
            self.inner.lock().root.clone()
        }

        /// Add an organizational unit under `parent`
        pub fn add_ou(&self, parent: &str, id: &str, name: &str) {
            self.inner
                .lock()
                .ous
                .entry(TargetId::new(parent))
                .or_default()
                .push(OrgNode::new(id, name));
        }

        /// Add an account under `parent`
        pub fn add_account(&self, parent: &str, id: &str, name: &str) {
            self.inner
                .lock()
                .accounts
                .entry(TargetId::new(parent))
                .or_default()
                .push(OrgNode::new(id, name));
        }

        /// Seed an existing customer-managed policy
        pub fn seed_policy(&self, name: &str, policy_type: PolicyType, content: &str) -> PolicyId {
            let description = format!("ADF Managed {policy_type}");
            self.inner.lock().insert_policy(
                &PolicyName::new(name),
                policy_type,
                &description,
                content,
                false,
            )
        }

        /// Seed a provider-managed policy such as `FullAWSAccess`
        pub fn seed_aws_managed(&self, name: &str, policy_type: PolicyType) -> PolicyId {
            self.inner.lock().insert_policy(&PolicyName::new(name), policy_type, "", "{}", true)
        }

        pub fn seed_attachment(&self, policy: &PolicyId, target: &str) {
            self.inner.lock().attachments.push((policy.clone(), TargetId::new(target)));
        }

        /// Fail the next `times` calls of `kind` with `error`
        pub fn fail(&self, kind: OrgCallKind, error: AdapterError, times: u32) {
            self.inner.lock().failures.push(ScriptedFailure { kind, error, remaining: times });
        }

        pub fn calls(&self) -> Vec<OrgCall> {
            self.inner.lock().calls.clone()
        }

        /// Recorded calls that change provider state, in order
        pub fn mutations(&self) -> Vec<OrgCall> {
            self.calls().into_iter().filter(OrgCall::is_mutation).collect()
        }

        pub fn count(&self, kind: OrgCallKind) -> usize {
            self.inner.lock().calls.iter().filter(|c| c.kind() == kind).count()
        }

        pub fn clear_calls(&self) {
            self.inner.lock().calls.clear();
        }

        pub fn enabled_types(&self) -> Vec<PolicyType> {
            self.inner.lock().enabled.clone()
        }

        pub fn policy_by_name(&self, name: &str) -> Option<FakePolicy> {
            self.inner.lock().policies.values().find(|p| p.name == name).cloned()
        }

        /// Names of all customer-managed policies of `policy_type`
        pub fn policy_names(&self, policy_type: PolicyType) -> Vec<PolicyName> {
            self.inner
                .lock()
                .policies
                .values()
                .filter(|p| p.policy_type == policy_type && !p.aws_managed)
                .map(|p| p.name.clone())
                .collect()
        }

        /// Targets the named policy is attached to
        pub fn targets_of(&self, name: &str) -> Vec<TargetId> {
            let state = self.inner.lock();
            let Some(policy) = state.policies.values().find(|p| p.name == name) else {
                return Vec::new();
            };
            state
                .attachments
                .iter()
                .filter(|(p, _)| *p == policy.id)
                .map(|(_, t)| t.clone())
                .collect()
        }
    }

    #[async_trait]
    impl OrganizationsAdapter for FakeOrganizationsAdapter {
        async fn describe_organization(&self) -> Result<OrganizationInfo, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::DescribeOrganization)?;
            Ok(state.info.clone())
        }

        async fn enable_policy_type(&self, policy_type: PolicyType) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::EnablePolicyType(policy_type))?;
            if !state.enabled.contains(&policy_type) {
                state.enabled.push(policy_type);
            }
            Ok(())
        }

        async fn root_id(&self) -> Result<TargetId, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::RootId)?;
            Ok(state.root.clone())
        }

        async fn list_organizational_units(
            &self,
            parent: &TargetId,
        ) -> Result<Vec<OrgNode>, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::ListOrganizationalUnits(parent.clone()))?;
            Ok(state.ous.get(parent).cloned().unwrap_or_default())
        }

        async fn list_accounts(&self, parent: &TargetId) -> Result<Vec<OrgNode>, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::ListAccounts(parent.clone()))?;
            Ok(state.accounts.get(parent).cloned().unwrap_or_default())
        }

        async fn list_policies(
            &self,
            policy_type: PolicyType,
        ) -> Result<Vec<PolicySummary>, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::ListPolicies(policy_type))?;
            Ok(state
                .policies
                .values()
                .filter(|p| p.policy_type == policy_type)
                .map(FakePolicy::summary)
                .collect())
        }

        async fn list_policies_for_target(
            &self,
            target: &TargetId,
            policy_type: PolicyType,
        ) -> Result<Vec<PolicySummary>, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::ListPoliciesForTarget(target.clone()))?;
            Ok(state
                .attachments
                .iter()
                .filter(|(_, t)| t == target)
                .filter_map(|(p, _)| state.policies.get(p))
                .filter(|p| p.policy_type == policy_type)
                .map(FakePolicy::summary)
                .collect())
        }

        async fn list_targets_for_policy(
            &self,
            policy: &PolicyId,
        ) -> Result<Vec<TargetId>, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::ListTargetsForPolicy(policy.clone()))?;
            state.policy(policy)?;
            Ok(state
                .attachments
                .iter()
                .filter(|(p, _)| p == policy)
                .map(|(_, t)| t.clone())
                .collect())
        }

        async fn create_policy(&self, policy: NewPolicy<'_>) -> Result<PolicyId, AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::CreatePolicy { name: policy.name.clone() })?;
            if state.policies.values().any(|p| p.name == *policy.name) {
                return Err(AdapterError::AlreadyExists(policy.name.to_string()));
            }
            Ok(state.insert_policy(
                policy.name,
                policy.policy_type,
                policy.description,
                policy.content,
                false,
            ))
        }

        async fn update_policy(&self, policy: &PolicyId, content: &str) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::UpdatePolicy { policy: policy.clone() })?;
            let entry = state
                .policies
                .get_mut(policy)
                .ok_or_else(|| AdapterError::NotFound(policy.to_string()))?;
            entry.content = content.to_string();
            Ok(())
        }

        async fn attach_policy(
            &self,
            policy: &PolicyId,
            target: &TargetId,
        ) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            state
                .record(OrgCall::AttachPolicy { policy: policy.clone(), target: target.clone() })?;
            let policy_type = state.policy(policy)?.policy_type;
            if state.attachments.iter().any(|(p, t)| p == policy && t == target) {
                return Err(AdapterError::AlreadyExists(format!("{policy} on {target}")));
            }
            if state.attached_count(target, policy_type) >= policy_type.max_policies_per_target() {
                return Err(AdapterError::ConstraintViolation(format!(
                    "maximum {policy_type} policies attached to {target}"
                )));
            }
            state.attachments.push((policy.clone(), target.clone()));
            Ok(())
        }

        async fn detach_policy(
            &self,
            policy: &PolicyId,
            target: &TargetId,
        ) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            state
                .record(OrgCall::DetachPolicy { policy: policy.clone(), target: target.clone() })?;
            let before = state.attachments.len();
            state.attachments.retain(|(p, t)| !(p == policy && t == target));
            if state.attachments.len() == before {
                return Err(AdapterError::NotFound(format!("{policy} on {target}")));
            }
            Ok(())
        }

        async fn delete_policy(&self, policy: &PolicyId) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            state.record(OrgCall::DeletePolicy { policy: policy.clone() })?;
            state.policy(policy)?;
            if state.attachments.iter().any(|(p, _)| p == policy) {
                return Err(AdapterError::PolicyInUse(policy.to_string()));
            }
            state.policies.shift_remove(policy);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOrganizationsAdapter, FakePolicy, OrgCall, OrgCallKind};

#[cfg(test)]
#[path = "organizations_tests.rs"]
mod tests;
