// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! adf-engine: organization policy reconciliation
//!
//! [`PolicyReconciler`] drives one run: it checks the organization, builds
//! the target map, and for each policy type turns the difference between
//! the policy files and the recorded set into a [`Campaign`] of provider
//! mutations.

pub mod alias;
pub mod campaign;
pub mod events;
pub mod logging;
pub mod reconcile;
pub mod resolver;
pub mod retry;

pub use alias::{ensure_account_alias, AccountAliasRequest};
pub use campaign::{
    ApplySummary, Campaign, CampaignError, CampaignPlan, CampaignPolicy, Operation,
};
pub use events::{EventEmitter, POLICY_TYPE_ABORTED, POLICY_TYPE_APPLIED};
pub use reconcile::{
    diff, PolicyDiff, PolicyReconciler, ReconcileError, RunReport, SkipReason, TypeOutcome,
    TypeSummary,
};
pub use resolver::{build_tree_map, ResolveError, TargetResolver};
pub use retry::{with_retry, CallError};
