// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IAM adapter for a member account

use crate::AdapterError;
use async_trait::async_trait;

/// IAM operations in an already-assumed member account session
#[async_trait]
pub trait IamAdapter: Clone + Send + Sync + 'static {
    /// Create the account alias. An alias that already exists is
    /// `AdapterError::AlreadyExists`.
    async fn create_account_alias(&self, alias: &str) -> Result<(), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::IamAdapter;
    use crate::AdapterError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeIamState {
        aliases: Vec<String>,
        calls: usize,
        fail_with: Option<AdapterError>,
    }

    /// Fake IAM recording created aliases
    #[derive(Clone, Default)]
    pub struct FakeIamAdapter {
        inner: Arc<Mutex<FakeIamState>>,
    }

    impl FakeIamAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_alias(alias: &str) -> Self {
            let fake = Self::default();
            fake.inner.lock().aliases.push(alias.to_string());
            fake
        }

        pub fn fail_with(&self, error: AdapterError) {
            self.inner.lock().fail_with = Some(error);
        }

        pub fn aliases(&self) -> Vec<String> {
            self.inner.lock().aliases.clone()
        }

        pub fn calls(&self) -> usize {
            self.inner.lock().calls
        }
    }

    #[async_trait]
    impl IamAdapter for FakeIamAdapter {
        async fn create_account_alias(&self, alias: &str) -> Result<(), AdapterError> {
            let mut state = self.inner.lock();
            state.calls += 1;
            if let Some(error) = &state.fail_with {
                return Err(error.clone());
            }
            if state.aliases.iter().any(|a| a == alias) {
                return Err(AdapterError::AlreadyExists(alias.to_string()));
            }
            state.aliases.push(alias.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeIamAdapter;
