//! Aborted runs leave the recorded state untouched

use crate::prelude::*;
use adf_adapters::AdapterError;
use adf_engine::{SkipReason, TypeOutcome};

#[tokio::test]
async fn unknown_target_aborts_before_any_mutation() {
    let project = Project::new();
    let old = project.org.seed_policy("adf-scp-ou-a", SCP, DENY_LEAVE_ORG);
    project.org.seed_attachment(&old, "o-122");
    project.seed_record(SCP, &["adf-scp-ou-a"]);
    project.file("adf-policies/scp/g.json", &definition("guardrails", &["/nowhere"], DENY_LEAVE_ORG));

    let report = project.run().await;

    assert_eq!(
        report.outcome(SCP).map(ToString::to_string).as_deref(),
        Some("aborted (target '/nowhere' does not exist in the organization)")
    );
    assert_eq!(report.outcome(TAGGING), Some(&TypeOutcome::Skipped(SkipReason::EarlierAbort)));
    assert!(project.policy_mutations().is_empty());
    assert_eq!(project.targets_of("adf-scp-ou-a"), vec!["o-122"]);
    assert_eq!(project.recorded(SCP), Some(vec!["adf-scp-ou-a".to_string()]));
}

#[tokio::test]
async fn rerun_after_partial_failure_converges() {
    let project = Project::new();
    let old = project.org.seed_policy("adf-scp-ou-a", SCP, DENY_LEAVE_ORG);
    project.org.seed_attachment(&old, "o-122");
    project.seed_record(SCP, &["adf-scp-ou-a"]);
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);
    project.org.fail(OrgCallKind::AttachPolicy, AdapterError::AccessDenied("denied".into()), 1);

    let first = project.run().await;
    assert!(!first.is_success());
    assert_eq!(project.recorded(SCP), Some(vec!["adf-scp-ou-a".to_string()]));

    let second = project.run().await;

    assert!(second.is_success(), "{second}");
    assert_eq!(project.targets_of("adf-scp-ou-b"), vec!["o-123"]);
    assert_eq!(project.recorded(SCP), Some(vec!["adf-scp-ou-b".to_string()]));
}

#[tokio::test]
async fn throttling_is_absorbed_by_retries() {
    let project = Project::new();
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);
    project.org.fail(OrgCallKind::CreatePolicy, AdapterError::Throttled("TooManyRequests".into()), 2);

    let report = project.run().await;

    assert!(report.is_success(), "{report}");
    assert_eq!(project.org.count(OrgCallKind::CreatePolicy), 3);
}
