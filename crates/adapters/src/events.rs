// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus adapter

use crate::AdapterError;
use adf_core::LifecycleEvent;
use async_trait::async_trait;

/// Adapter for publishing lifecycle events
#[async_trait]
pub trait EventsAdapter: Clone + Send + Sync + 'static {
    async fn put_event(&self, event: LifecycleEvent) -> Result<(), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::EventsAdapter;
    use crate::AdapterError;
    use adf_core::LifecycleEvent;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake event bus recording every published event
    #[derive(Clone, Default)]
    pub struct FakeEventsAdapter {
        events: Arc<Mutex<Vec<LifecycleEvent>>>,
    }

    impl FakeEventsAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<LifecycleEvent> {
            self.events.lock().clone()
        }

        pub fn detail_types(&self) -> Vec<String> {
            self.events.lock().iter().map(|e| e.detail_type.clone()).collect()
        }
    }

    #[async_trait]
    impl EventsAdapter for FakeEventsAdapter {
        async fn put_event(&self, event: LifecycleEvent) -> Result<(), AdapterError> {
            self.events.lock().push(event);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEventsAdapter;
