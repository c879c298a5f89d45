// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parameter store adapter

use crate::AdapterError;
use async_trait::async_trait;

/// Key-value store holding state between runs
#[async_trait]
pub trait ParameterStoreAdapter: Clone + Send + Sync + 'static {
    /// Fetch a parameter. A missing parameter is `Ok(None)`.
    async fn get_parameter(&self, key: &str) -> Result<Option<String>, AdapterError>;

    /// Create or overwrite a parameter
    async fn put_parameter(&self, key: &str, value: &str) -> Result<(), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::ParameterStoreAdapter;
    use crate::AdapterError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeParameterState {
        values: HashMap<String, String>,
        puts: Vec<(String, String)>,
        fail_puts: Option<AdapterError>,
    }

    /// In-memory parameter store
    #[derive(Clone, Default)]
    pub struct FakeParameterStore {
        inner: Arc<Mutex<FakeParameterState>>,
    }

    impl FakeParameterStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a value without recording a put
        pub fn set(&self, key: &str, value: &str) {
            self.inner.lock().values.insert(key.to_string(), value.to_string());
        }

        pub fn value(&self, key: &str) -> Option<String> {
            self.inner.lock().values.get(key).cloned()
        }

        /// Every `put_parameter` call, in order
        pub fn puts(&self) -> Vec<(String, String)> {
            self.inner.lock().puts.clone()
        }

        /// Make every subsequent put fail with `error`
        pub fn fail_puts(&self, error: AdapterError) {
            self.inner.lock().fail_puts = Some(error);
        }
    }

    #[async_trait]
    impl ParameterStoreAdapter for FakeParameterStore {
        async fn get_parameter(&self, key: &str) -> Result<Option<String>, AdapterError> {
            Ok(self.inner.lock().values.get(key).cloned())
        }

        async fn put_parameter(&self, key: &str, value: &str) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            if let Some(error) = &state.fail_puts {
                return Err(error.clone());
            }
            state.puts.push((key.to_string(), value.to_string()));
            state.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeParameterStore;
