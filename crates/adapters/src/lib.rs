// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! adf-adapters: interfaces to the cloud services the reconciler drives
//!
//! Each adapter is a trait; production implementations live with the host
//! process that owns credentials. In-memory fakes are exported behind the
//! `test-support` feature.

mod error;
pub mod events;
pub mod iam;
pub mod organizations;
pub mod parameters;

pub use error::AdapterError;
pub use events::EventsAdapter;
pub use iam::IamAdapter;
pub use organizations::{NewPolicy, OrganizationsAdapter, PolicySummary};
pub use parameters::ParameterStoreAdapter;

#[cfg(any(test, feature = "test-support"))]
pub use events::FakeEventsAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use iam::FakeIamAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use organizations::{FakeOrganizationsAdapter, FakePolicy, OrgCall, OrgCallKind};
#[cfg(any(test, feature = "test-support"))]
pub use parameters::FakeParameterStore;
