// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! adf-core: shared types for ADF organization policy reconciliation

pub mod macros;

pub mod config;
pub mod env;
pub mod event;
pub mod id;
pub mod organization;
pub mod policy;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{Config, ConfigError, RetrySettings};
pub use event::LifecycleEvent;
pub use id::{PolicyId, PolicyName, TargetId};
pub use organization::{child_path, FeatureSet, OrgNode, OrganizationInfo, OrganizationMap};
#[cfg(any(test, feature = "test-support"))]
pub use policy::PolicyDocumentBuilder;
pub use policy::{PolicyDocument, PolicySource, PolicyType, UnknownPolicyType};
