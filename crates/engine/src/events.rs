// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle event publishing

use adf_adapters::{AdapterError, EventsAdapter};
use adf_core::event::DEFAULT_NAMESPACE;
use adf_core::{Config, LifecycleEvent};
use serde_json::Value;

/// Service name of the policy reconciler on the event bus
pub const SERVICE: &str = "OrganizationPolicy";

pub const POLICY_TYPE_APPLIED: &str = "POLICY_TYPE_APPLIED";
pub const POLICY_TYPE_ABORTED: &str = "POLICY_TYPE_ABORTED";

/// Builds [`LifecycleEvent`]s for one service and publishes them.
#[derive(Clone)]
pub struct EventEmitter<E> {
    events: E,
    namespace: String,
    service: String,
    event_bus: String,
    trace_header: Option<String>,
}

impl<E: EventsAdapter> EventEmitter<E> {
    pub fn new(events: E, service: impl Into<String>, config: &Config) -> Self {
        Self {
            events,
            namespace: DEFAULT_NAMESPACE.to_string(),
            service: service.into(),
            event_bus: config.event_bus.clone(),
            trace_header: config.trace_header.clone(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn source(&self) -> String {
        format!("{}.{}", self.namespace, self.service)
    }

    pub fn event(&self, detail_type: &str, detail: Value, resources: Vec<String>) -> LifecycleEvent {
        LifecycleEvent {
            source: self.source(),
            resources,
            detail_type: detail_type.to_string(),
            detail,
            event_bus_name: self.event_bus.clone(),
            trace_header: self.trace_header.clone(),
        }
    }

    pub async fn emit(
        &self,
        detail_type: &str,
        detail: Value,
        resources: Vec<String>,
    ) -> Result<(), AdapterError> {
        let event = self.event(detail_type, detail, resources);
        tracing::debug!(source = %event.source, detail_type, bus = %event.event_bus_name, "publishing event");
        self.events.put_event(event).await
    }
}
