//! Shared harness for policy specs

use std::path::Path;
use std::time::Duration;

use adf_adapters::{FakeEventsAdapter, FakeOrganizationsAdapter, FakeParameterStore, OrgCall};
use adf_core::{Config, PolicyName, RetrySettings};
use adf_engine::events::SERVICE;
use adf_engine::{EventEmitter, PolicyReconciler, RunReport};
use adf_storage::{PolicyRecord, PolicyStore};
use tempfile::TempDir;

pub use adf_adapters::OrgCallKind;
pub use adf_core::PolicyType;

pub const SCP: PolicyType = PolicyType::ServiceControl;
pub const TAGGING: PolicyType = PolicyType::Tagging;

pub const DENY_LEAVE_ORG: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {"Effect": "Deny", "Action": "organizations:LeaveOrganization", "Resource": "*"}
  ]
}"#;

/// Temporary ADF repository plus fake provider services.
///
/// The organization has OUs `ou-a` (`o-122`) and `ou-b` (`o-123`) under the
/// root, and `deployment/banking` (`o-200`/`o-201`).
pub struct Project {
    dir: TempDir,
    pub config: Config,
    pub org: FakeOrganizationsAdapter,
    pub params: FakeParameterStore,
    pub events: FakeEventsAdapter,
}

impl Project {
    pub fn new() -> Self {
        Self::in_region("eu-west-1")
    }

    pub fn in_region(region: &str) -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["adf-policies/scp", "adf-policies/tagging-policy", "adf-bootstrap"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        let config = Config::new(region)
            .policies_dir(dir.path().join("adf-policies"))
            .bootstrap_dir(dir.path().join("adf-bootstrap"))
            .retry(RetrySettings {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
            });

        let org = FakeOrganizationsAdapter::new();
        org.add_ou("r-root", "o-122", "ou-a");
        org.add_ou("r-root", "o-123", "ou-b");
        org.add_ou("r-root", "o-200", "deployment");
        org.add_ou("o-200", "o-201", "banking");
        org.add_account("o-201", "123456789012", "banking-prod");

        Self {
            dir,
            config,
            org,
            params: FakeParameterStore::new(),
            events: FakeEventsAdapter::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.dir.path().join(relative)).unwrap();
    }

    /// Store a versioned record as if written by an earlier run
    pub fn seed_record(&self, policy_type: PolicyType, names: &[&str]) {
        let set = names.iter().map(|n| PolicyName::new(*n)).collect();
        self.params.set(policy_type.stem(), &PolicyRecord::new(set).encode().unwrap());
    }

    pub fn recorded(&self, policy_type: PolicyType) -> Option<Vec<String>> {
        let raw = self.params.value(policy_type.stem())?;
        let record = PolicyRecord::decode(&raw, policy_type).unwrap();
        Some(record.into_policies().into_iter().map(|n| n.to_string()).collect())
    }

    pub async fn run(&self) -> RunReport {
        let reconciler = PolicyReconciler::new(
            &self.config,
            self.org.clone(),
            PolicyStore::new(self.params.clone(), &self.config),
            EventEmitter::new(self.events.clone(), SERVICE, &self.config),
        );
        reconciler.run().await.unwrap()
    }

    /// Policy create/update/attach/detach/delete calls since the last clear
    pub fn policy_mutations(&self) -> Vec<OrgCallKind> {
        self.org
            .mutations()
            .iter()
            .map(OrgCall::kind)
            .filter(|k| *k != OrgCallKind::EnablePolicyType)
            .collect()
    }

    pub fn targets_of(&self, name: &str) -> Vec<String> {
        self.org.targets_of(name).into_iter().map(|t| t.to_string()).collect()
    }
}

/// Definition-layout file body
pub fn definition(name: &str, targets: &[&str], policy: &str) -> String {
    let targets: Vec<String> = targets.iter().map(|t| format!("\"{t}\"")).collect();
    format!(
        r#"{{"Version": "2022-10-14", "PolicyName": "{name}", "Targets": [{}], "Policy": {policy}}}"#,
        targets.join(", ")
    )
}
