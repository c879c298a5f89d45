// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! adf-storage: policy documents on disk and the applied-policy record

mod error;
pub mod layout;
pub mod record;
mod store;

pub use error::StoreError;
pub use layout::{legacy_policy_name, legacy_target_path, PolicyDefinition, DEFINITION_VERSION};
pub use record::{PolicyRecord, RecordError, RECORD_VERSION};
pub use store::PolicyStore;
