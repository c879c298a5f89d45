// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application campaign: the per-type batch of policy mutations.
//!
//! Policies are registered with [`Campaign::get_policy`] and scheduled for
//! removal with [`Campaign::delete_policy`]. [`Campaign::apply`] reads the
//! provider state once, validates the whole plan, then issues mutations in
//! phases: detachments, deletions, creations and updates, attachments.
//! Nothing is mutated if validation fails. A rejected call stops the
//! campaign; operations already issued are not rolled back.

use crate::resolver::{ResolveError, TargetResolver};
use crate::retry::{with_retry, CallError};
use adf_adapters::{NewPolicy, OrganizationsAdapter, PolicySummary};
use adf_core::{OrganizationMap, PolicyId, PolicyName, PolicyType, RetrySettings, TargetId};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A single provider mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Detach { policy: PolicyName, target: TargetId },
    Delete { policy: PolicyName },
    Create { policy: PolicyName },
    Update { policy: PolicyName },
    Attach { policy: PolicyName, target: TargetId },
}

impl Operation {
    pub fn policy(&self) -> &PolicyName {
        match self {
            Operation::Detach { policy, .. }
            | Operation::Delete { policy }
            | Operation::Create { policy }
            | Operation::Update { policy }
            | Operation::Attach { policy, .. } => policy,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Detach { policy, target } => write!(f, "detach {policy} from {target}"),
            Operation::Delete { policy } => write!(f, "delete {policy}"),
            Operation::Create { policy } => write!(f, "create {policy}"),
            Operation::Update { policy } => write!(f, "update {policy}"),
            Operation::Attach { policy, target } => write!(f, "attach {policy} to {target}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("policy {policy} is {size} characters; {policy_type} policies are limited to {limit}")]
    PolicyTooLarge { policy: PolicyName, policy_type: PolicyType, size: usize, limit: usize },
    #[error(
        "target {target} would have {count} {policy_type} policies attached; the limit is {limit}"
    )]
    TooManyPolicies { target: TargetId, policy_type: PolicyType, count: usize, limit: usize },
    #[error("{source} ({completed} operations completed)")]
    RetriesExhausted {
        completed: usize,
        #[source]
        source: CallError,
    },
    #[error("{source} ({completed} operations completed)")]
    Provider {
        completed: usize,
        #[source]
        source: CallError,
    },
    #[error("policy {0} has no provider id")]
    UnknownPolicy(PolicyName),
}

impl CampaignError {
    fn from_call(source: CallError, completed: usize) -> Self {
        match source {
            CallError::Exhausted { .. } => CampaignError::RetriesExhausted { completed, source },
            CallError::Rejected { .. } => CampaignError::Provider { completed, source },
        }
    }

    /// Mutations issued before the failure
    pub fn completed(&self) -> usize {
        match self {
            CampaignError::RetriesExhausted { completed, .. }
            | CampaignError::Provider { completed, .. } => *completed,
            _ => 0,
        }
    }
}

/// Desired state of one policy within a campaign
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignPolicy {
    name: PolicyName,
    body: Value,
    description: Option<String>,
    targets: IndexSet<TargetId>,
}

impl CampaignPolicy {
    fn new(name: PolicyName, body: Value) -> Self {
        Self { name, body, description: None, targets: IndexSet::new() }
    }

    pub fn name(&self) -> &PolicyName {
        &self.name
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetId> {
        self.targets.iter()
    }

    /// Replace the desired target set. Duplicates collapse.
    pub fn set_targets(&mut self, targets: impl IntoIterator<Item = TargetId>) -> &mut Self {
        self.targets = targets.into_iter().collect();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    fn content(&self) -> String {
        self.body.to_string()
    }

    fn description_for(&self, policy_type: PolicyType) -> String {
        self.description.clone().unwrap_or_else(|| format!("ADF Managed {policy_type}"))
    }
}

/// Ordered mutations computed against the provider's current state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignPlan {
    pub operations: Vec<Operation>,
    existing: HashMap<PolicyName, PolicyId>,
}

impl CampaignPlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Mutations issued by a successful [`Campaign::apply`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: Vec<Operation>,
}

impl ApplySummary {
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn created(&self) -> impl Iterator<Item = &PolicyName> {
        self.applied.iter().filter_map(|op| match op {
            Operation::Create { policy } => Some(policy),
            _ => None,
        })
    }

    pub fn deleted(&self) -> impl Iterator<Item = &PolicyName> {
        self.applied.iter().filter_map(|op| match op {
            Operation::Delete { policy } => Some(policy),
            _ => None,
        })
    }
}

pub struct Campaign<'a, O> {
    policy_type: PolicyType,
    org: &'a O,
    resolver: TargetResolver<'a>,
    retry: RetrySettings,
    policies: IndexMap<PolicyName, CampaignPolicy>,
    deletions: IndexSet<PolicyName>,
}

impl<'a, O: OrganizationsAdapter> Campaign<'a, O> {
    pub fn new(
        policy_type: PolicyType,
        org: &'a O,
        map: &'a OrganizationMap,
        retry: RetrySettings,
    ) -> Self {
        Self {
            policy_type,
            org,
            resolver: TargetResolver::new(map),
            retry,
            policies: IndexMap::new(),
            deletions: IndexSet::new(),
        }
    }

    pub fn policy_type(&self) -> PolicyType {
        self.policy_type
    }

    pub fn get_target(&self, path: &str) -> Result<TargetId, ResolveError> {
        self.resolver.resolve_target(path)
    }

    /// Register `name`, or replace its body if already registered.
    ///
    /// Registering a name that was scheduled for deletion cancels the deletion.
    pub fn get_policy(&mut self, name: PolicyName, body: Value) -> &mut CampaignPolicy {
        if self.deletions.shift_remove(&name) {
            tracing::debug!(policy = %name, "re-registered policy, deletion cancelled");
        }
        match self.policies.entry(name) {
            Entry::Occupied(entry) => {
                let policy = entry.into_mut();
                policy.body = body;
                policy
            }
            Entry::Vacant(entry) => {
                let policy = CampaignPolicy::new(entry.key().clone(), body);
                entry.insert(policy)
            }
        }
    }

    /// Schedule `name` for detachment from all its targets and deletion.
    ///
    /// Cancels an earlier [`Campaign::get_policy`] for the same name.
    pub fn delete_policy(&mut self, name: PolicyName) {
        self.policies.shift_remove(&name);
        self.deletions.insert(name);
    }

    pub fn policies(&self) -> impl Iterator<Item = &CampaignPolicy> {
        self.policies.values()
    }

    pub fn deletions(&self) -> impl Iterator<Item = &PolicyName> {
        self.deletions.iter()
    }

    /// Compute and validate the mutations without issuing any of them.
    pub async fn plan(&self) -> Result<CampaignPlan, CampaignError> {
        self.check_sizes()?;

        let existing: HashMap<PolicyName, PolicySummary> = self
            .read(format!("list {} policies", self.policy_type), || {
                self.org.list_policies(self.policy_type)
            })
            .await?
            .into_iter()
            .filter(|summary| !summary.aws_managed)
            .map(|summary| (summary.name.clone(), summary))
            .collect();

        let mut detaches = Vec::new();
        let mut deletes = Vec::new();
        let mut upserts = Vec::new();
        let mut attaches = Vec::new();

        for name in &self.deletions {
            let Some(summary) = existing.get(name) else {
                tracing::debug!(policy = %name, "scheduled deletion already absent");
                continue;
            };
            for target in self.current_targets(summary).await? {
                detaches.push(Operation::Detach { policy: name.clone(), target });
            }
            deletes.push(Operation::Delete { policy: name.clone() });
        }

        for policy in self.policies.values() {
            let current = match existing.get(&policy.name) {
                Some(summary) => {
                    upserts.push(Operation::Update { policy: policy.name.clone() });
                    self.current_targets(summary).await?
                }
                None => {
                    upserts.push(Operation::Create { policy: policy.name.clone() });
                    IndexSet::new()
                }
            };
            for target in current.difference(&policy.targets) {
                detaches.push(Operation::Detach {
                    policy: policy.name.clone(),
                    target: target.clone(),
                });
            }
            for target in policy.targets.difference(&current) {
                attaches.push(Operation::Attach {
                    policy: policy.name.clone(),
                    target: target.clone(),
                });
            }
        }

        self.check_ceilings(&detaches, &attaches).await?;

        let mut operations = detaches;
        operations.extend(deletes);
        operations.extend(upserts);
        operations.extend(attaches);
        Ok(CampaignPlan {
            operations,
            existing: existing.into_iter().map(|(name, summary)| (name, summary.id)).collect(),
        })
    }

    /// Plan, validate, then issue every mutation in phase order.
    pub async fn apply(self) -> Result<ApplySummary, CampaignError> {
        let plan = self.plan().await?;
        tracing::info!(
            policy_type = %self.policy_type,
            operations = plan.operations.len(),
            deletions = self.deletions.len(),
            policies = self.policies.len(),
            "applying campaign"
        );

        let mut ids = plan.existing;
        let mut summary = ApplySummary::default();
        for (completed, op) in plan.operations.into_iter().enumerate() {
            let label = op.to_string();
            let result = match &op {
                Operation::Detach { policy, target } => {
                    let id = policy_id(&ids, policy)?;
                    with_retry(&self.retry, &label, || self.org.detach_policy(id, target)).await
                }
                Operation::Delete { policy } => {
                    let id = policy_id(&ids, policy)?;
                    with_retry(&self.retry, &label, || self.org.delete_policy(id)).await
                }
                Operation::Create { policy } => {
                    let entry = self.registered(policy)?;
                    let content = entry.content();
                    let description = entry.description_for(self.policy_type);
                    let new = NewPolicy {
                        name: policy,
                        description: &description,
                        policy_type: self.policy_type,
                        content: &content,
                    };
                    with_retry(&self.retry, &label, || self.org.create_policy(new.clone()))
                        .await
                        .map(|id| {
                            ids.insert(policy.clone(), id);
                        })
                }
                Operation::Update { policy } => {
                    let content = self.registered(policy)?.content();
                    let id = policy_id(&ids, policy)?;
                    with_retry(&self.retry, &label, || self.org.update_policy(id, &content)).await
                }
                Operation::Attach { policy, target } => {
                    let id = policy_id(&ids, policy)?;
                    with_retry(&self.retry, &label, || self.org.attach_policy(id, target)).await
                }
            };
            if let Err(e) = result {
                tracing::error!(operation = %op, completed, error = %e, "campaign aborted");
                return Err(CampaignError::from_call(e, completed));
            }
            tracing::info!(operation = %op, "applied");
            summary.applied.push(op);
        }
        Ok(summary)
    }

    fn check_sizes(&self) -> Result<(), CampaignError> {
        let limit = self.policy_type.max_document_size();
        for policy in self.policies.values() {
            let size = policy.content().chars().count();
            if size > limit {
                return Err(CampaignError::PolicyTooLarge {
                    policy: policy.name.clone(),
                    policy_type: self.policy_type,
                    size,
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Project the attachments of every target that gains a policy.
    async fn check_ceilings(
        &self,
        detaches: &[Operation],
        attaches: &[Operation],
    ) -> Result<(), CampaignError> {
        let mut incoming: IndexMap<&TargetId, Vec<&PolicyName>> = IndexMap::new();
        for op in attaches {
            if let Operation::Attach { policy, target } = op {
                incoming.entry(target).or_default().push(policy);
            }
        }

        let limit = self.policy_type.max_policies_per_target();
        for (target, policies) in incoming {
            let attached = self
                .read(format!("list {} policies for {target}", self.policy_type), || {
                    self.org.list_policies_for_target(target, self.policy_type)
                })
                .await?;
            let mut projected: IndexSet<PolicyName> =
                attached.into_iter().map(|summary| summary.name).collect();
            for op in detaches {
                if let Operation::Detach { policy, target: from } = op {
                    if from == target {
                        projected.shift_remove(policy);
                    }
                }
            }
            projected.extend(policies.into_iter().cloned());

            if projected.len() > limit {
                return Err(CampaignError::TooManyPolicies {
                    target: target.clone(),
                    policy_type: self.policy_type,
                    count: projected.len(),
                    limit,
                });
            }
        }
        Ok(())
    }

    async fn current_targets(
        &self,
        summary: &PolicySummary,
    ) -> Result<IndexSet<TargetId>, CampaignError> {
        let targets = self
            .read(format!("list targets for {}", summary.name), || {
                self.org.list_targets_for_policy(&summary.id)
            })
            .await?;
        Ok(targets.into_iter().collect())
    }

    async fn read<T, F, Fut>(&self, label: String, call: F) -> Result<T, CampaignError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, adf_adapters::AdapterError>>,
    {
        with_retry(&self.retry, label, call).await.map_err(|e| CampaignError::from_call(e, 0))
    }

    fn registered(&self, name: &PolicyName) -> Result<&CampaignPolicy, CampaignError> {
        self.policies.get(name).ok_or_else(|| CampaignError::UnknownPolicy(name.clone()))
    }
}

fn policy_id<'m>(
    ids: &'m HashMap<PolicyName, PolicyId>,
    name: &PolicyName,
) -> Result<&'m PolicyId, CampaignError> {
    ids.get(name).ok_or_else(|| CampaignError::UnknownPolicy(name.clone()))
}

#[cfg(test)]
#[path = "campaign_tests.rs"]
mod tests;
