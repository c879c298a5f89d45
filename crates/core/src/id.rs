// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Names and provider identifiers

crate::define_name! {
    /// Name of an organization policy (e.g. `adf-scp-deployment`).
    ///
    /// The name is the reconciliation identifier: it is what the policy
    /// record persists between runs and what the campaign keys mutations by.
    pub struct PolicyName;
}

crate::define_name! {
    /// Provider-assigned policy identifier (e.g. `p-abc123`).
    pub struct PolicyId;
}

crate::define_name! {
    /// Provider-assigned identifier of a policy target: the root, an
    /// organizational unit, or an account.
    pub struct TargetId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
