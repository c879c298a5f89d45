// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle events published to the event bus

use serde::{Deserialize, Serialize};

/// Default event source namespace
pub const DEFAULT_NAMESPACE: &str = "ADF";

/// One entry of a `PutEvents` call.
///
/// Serializes with the provider's field names (`Source`, `DetailType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    /// `<namespace>.<service>`, e.g. `ADF.OrganizationPolicy`
    pub source: String,
    pub resources: Vec<String>,
    pub detail_type: String,
    pub detail: serde_json::Value,
    pub event_bus_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_header: Option<String>,
}
