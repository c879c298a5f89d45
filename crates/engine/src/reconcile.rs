// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation driver.
//!
//! For each supported policy type: load the documents on disk and the set
//! recorded by the previous run, schedule deletions for names that
//! disappeared, submit every current document with its resolved targets,
//! apply the campaign, and record the new set only when the campaign
//! succeeded.

use crate::campaign::{ApplySummary, Campaign, CampaignError};
use crate::events::{EventEmitter, POLICY_TYPE_ABORTED, POLICY_TYPE_APPLIED};
use crate::resolver::{build_tree_map, ResolveError};
use crate::retry::{with_retry, CallError};
use adf_adapters::{AdapterError, EventsAdapter, OrganizationsAdapter, ParameterStoreAdapter};
use adf_core::{Config, FeatureSet, OrganizationMap, PolicyDocument, PolicyName, PolicyType};
use adf_storage::{PolicyStore, StoreError};
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Campaign(#[from] CampaignError),
    #[error(transparent)]
    Call(#[from] CallError),
    #[error("failed to publish {detail_type} event: {source}")]
    Event {
        detail_type: String,
        #[source]
        source: AdapterError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    FeatureSetNotAll,
    UnsupportedInRegion,
    EarlierAbort,
}

adf_core::simple_display! {
    SkipReason {
        FeatureSetNotAll => "feature set not ALL",
        UnsupportedInRegion => "unsupported in region",
        EarlierAbort => "earlier policy type aborted",
    }
}

/// What a successful type reconciliation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSummary {
    pub deleted: BTreeSet<PolicyName>,
    pub submitted: BTreeSet<PolicyName>,
    pub operations: ApplySummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOutcome {
    Applied(TypeSummary),
    Skipped(SkipReason),
    Aborted(String),
}

impl fmt::Display for TypeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeOutcome::Applied(_) => f.write_str("applied"),
            TypeOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            TypeOutcome::Aborted(reason) => write!(f, "aborted ({reason})"),
        }
    }
}

/// Outcome of every policy type, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    outcomes: Vec<(PolicyType, TypeOutcome)>,
}

impl RunReport {
    fn push(&mut self, policy_type: PolicyType, outcome: TypeOutcome) {
        tracing::info!(%policy_type, %outcome, "policy type finished");
        self.outcomes.push((policy_type, outcome));
    }

    pub fn outcomes(&self) -> &[(PolicyType, TypeOutcome)] {
        &self.outcomes
    }

    pub fn outcome(&self, policy_type: PolicyType) -> Option<&TypeOutcome> {
        self.outcomes.iter().find(|(t, _)| *t == policy_type).map(|(_, o)| o)
    }

    /// No type aborted
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(|(_, o)| matches!(o, TypeOutcome::Aborted(_)))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (policy_type, outcome)) in self.outcomes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{policy_type}: {outcome}")?;
        }
        Ok(())
    }
}

/// Names to delete and names submitted this run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDiff {
    pub to_delete: BTreeSet<PolicyName>,
    pub current: BTreeSet<PolicyName>,
}

pub fn diff(previous: &BTreeSet<PolicyName>, documents: &[PolicyDocument]) -> PolicyDiff {
    let current: BTreeSet<PolicyName> = documents.iter().map(|d| d.name.clone()).collect();
    let to_delete = previous.difference(&current).cloned().collect();
    PolicyDiff { to_delete, current }
}

pub struct PolicyReconciler<'a, O, P, E> {
    config: &'a Config,
    org: O,
    store: PolicyStore<P>,
    events: EventEmitter<E>,
}

impl<'a, O, P, E> PolicyReconciler<'a, O, P, E>
where
    O: OrganizationsAdapter,
    P: ParameterStoreAdapter,
    E: EventsAdapter,
{
    pub fn new(config: &'a Config, org: O, store: PolicyStore<P>, events: EventEmitter<E>) -> Self {
        Self { config, org, store, events }
    }

    /// Policy types supported in the configured region
    pub fn supported_types(&self) -> Vec<PolicyType> {
        if self.config.is_govcloud() {
            vec![PolicyType::ServiceControl]
        } else {
            PolicyType::ALL.to_vec()
        }
    }

    /// Reconcile every supported policy type.
    ///
    /// Organization-level failures are returned as errors. Failures of a
    /// single type are reported as [`TypeOutcome::Aborted`] and stop the
    /// remaining types.
    pub async fn run(&self) -> Result<RunReport, ReconcileError> {
        let retry = &self.config.retry;
        let mut report = RunReport::default();

        let info =
            with_retry(retry, "describe organization", || self.org.describe_organization())
                .await?;
        if info.feature_set != FeatureSet::All {
            tracing::warn!(
                organization = %info.id,
                feature_set = %info.feature_set,
                "organization policies need all features enabled"
            );
            for policy_type in PolicyType::ALL {
                report.push(policy_type, TypeOutcome::Skipped(SkipReason::FeatureSetNotAll));
            }
            return Ok(report);
        }

        let supported = self.supported_types();
        for policy_type in &supported {
            with_retry(retry, format!("enable {policy_type} policies"), || {
                self.org.enable_policy_type(*policy_type)
            })
            .await?;
        }

        let root = with_retry(retry, "describe root", || self.org.root_id()).await?;
        let map = build_tree_map(&self.org, &root, retry).await?;

        let mut halted = false;
        for policy_type in PolicyType::ALL {
            if !supported.contains(&policy_type) {
                report.push(policy_type, TypeOutcome::Skipped(SkipReason::UnsupportedInRegion));
                continue;
            }
            if halted {
                report.push(policy_type, TypeOutcome::Skipped(SkipReason::EarlierAbort));
                continue;
            }

            let outcome = match self.reconcile_type(policy_type, &map).await {
                Ok(summary) => {
                    let detail = json!({
                        "policy_type": policy_type.stem(),
                        "submitted": summary.submitted,
                        "deleted": summary.deleted,
                        "operations": summary.operations.len(),
                    });
                    self.publish(POLICY_TYPE_APPLIED, detail, &root).await?;
                    TypeOutcome::Applied(summary)
                }
                Err(e) => {
                    tracing::error!(%policy_type, error = %e, "policy type aborted");
                    halted = true;
                    let detail = json!({
                        "policy_type": policy_type.stem(),
                        "reason": e.to_string(),
                    });
                    self.publish(POLICY_TYPE_ABORTED, detail, &root).await?;
                    TypeOutcome::Aborted(e.to_string())
                }
            };
            report.push(policy_type, outcome);
        }
        Ok(report)
    }

    /// Load, diff, schedule, apply, and on success persist one policy type.
    pub async fn reconcile_type(
        &self,
        policy_type: PolicyType,
        map: &OrganizationMap,
    ) -> Result<TypeSummary, ReconcileError> {
        let documents = self.store.load_file_system_policies(policy_type)?;
        let previous = self.store.load_previous_policy_set(policy_type).await?;
        let PolicyDiff { to_delete, current } = diff(&previous, &documents);

        let mut campaign = Campaign::new(policy_type, &self.org, map, self.config.retry);
        for name in &to_delete {
            tracing::info!(%policy_type, policy = %name, "policy removed from disk, scheduling deletion");
            campaign.delete_policy(name.clone());
        }
        for document in &documents {
            let targets = document
                .targets
                .iter()
                .map(|path| campaign.get_target(path))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(
                policy = %document.name,
                source = %document.source,
                targets = ?targets,
                "scheduling policy"
            );
            let policy = campaign.get_policy(document.name.clone(), document.body.clone());
            policy.set_targets(targets);
            if let Some(description) = &document.description {
                policy.set_description(description.clone());
            }
        }

        let operations = campaign.apply().await?;
        self.store.save_policy_set(policy_type, &current).await?;
        Ok(TypeSummary { deleted: to_delete, submitted: current, operations })
    }

    async fn publish(
        &self,
        detail_type: &str,
        detail: serde_json::Value,
        root: &adf_core::TargetId,
    ) -> Result<(), ReconcileError> {
        self.events
            .emit(detail_type, detail, vec![root.to_string()])
            .await
            .map_err(|source| ReconcileError::Event { detail_type: detail_type.to_string(), source })
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
