//! End-to-end reconciliation specs
//!
//! A run replaces policies that disappeared from the repository and
//! attaches current ones to their resolved targets.

use crate::prelude::*;

#[tokio::test]
async fn removed_policy_is_replaced_by_current_one() {
    let project = Project::new();
    let old = project.org.seed_policy("adf-scp-ou-a", SCP, DENY_LEAVE_ORG);
    project.org.seed_attachment(&old, "o-122");
    project.seed_record(SCP, &["adf-scp-ou-a"]);
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);

    let report = project.run().await;

    assert!(report.is_success(), "{report}");
    assert!(project.org.policy_by_name("adf-scp-ou-a").is_none());
    assert_eq!(project.targets_of("adf-scp-ou-b"), vec!["o-123"]);
    assert_eq!(project.recorded(SCP), Some(vec!["adf-scp-ou-b".to_string()]));
}

#[tokio::test]
async fn report_lists_every_policy_type() {
    let project = Project::new();

    let report = project.run().await;

    similar_asserts::assert_eq!(report.to_string(), "scp: applied\ntagging-policy: applied");
    assert_eq!(project.events.detail_types().len(), 2);
}

#[tokio::test]
async fn legacy_and_definition_layouts_are_combined() {
    let project = Project::new();
    project.file("adf-bootstrap/deployment/banking/scp.json", DENY_LEAVE_ORG);
    project.file("adf-bootstrap/scp.json", DENY_LEAVE_ORG);
    project.file(
        "adf-policies/scp/guardrails.json",
        &definition("guardrails", &["deployment", "banking-prod"], DENY_LEAVE_ORG),
    );
    project.file(
        "adf-policies/tagging-policy/owner.json",
        &definition("owner-tag", &["/"], r#"{"tags": {"owner": {}}}"#),
    );

    let report = project.run().await;

    assert!(report.is_success(), "{report}");
    assert_eq!(project.targets_of("adf-scp-deployment/banking"), vec!["o-201"]);
    assert_eq!(project.targets_of("adf-scp-/"), vec!["r-root"]);
    assert_eq!(project.targets_of("guardrails"), vec!["o-200", "123456789012"]);
    assert_eq!(project.targets_of("owner-tag"), vec!["r-root"]);
    similar_asserts::assert_eq!(
        project.recorded(SCP),
        Some(vec![
            "adf-scp-/".to_string(),
            "adf-scp-deployment/banking".to_string(),
            "guardrails".to_string(),
        ])
    );
}

#[tokio::test]
async fn govcloud_leaves_tagging_policies_alone() {
    let project = Project::in_region("us-gov-west-1");
    project.file(
        "adf-policies/tagging-policy/owner.json",
        &definition("owner-tag", &["/"], r#"{"tags": {"owner": {}}}"#),
    );

    let report = project.run().await;

    assert_eq!(
        report.outcome(TAGGING).map(ToString::to_string).as_deref(),
        Some("skipped (unsupported in region)")
    );
    assert!(project.org.policy_by_name("owner-tag").is_none());
    assert_eq!(project.recorded(TAGGING), None);
}

#[tokio::test]
async fn duplicate_policy_names_abort_the_type() {
    let project = Project::new();
    project.file("adf-policies/scp/a.json", &definition("same", &["ou-a"], DENY_LEAVE_ORG));
    project.file("adf-policies/scp/b.json", &definition("same", &["ou-b"], DENY_LEAVE_ORG));

    let report = project.run().await;

    assert!(!report.is_success());
    assert!(project.policy_mutations().is_empty());
    assert!(project.path().join("adf-policies/scp/a.json").exists());
}

#[tokio::test]
async fn hidden_bootstrap_directories_are_not_policies() {
    let project = Project::new();
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);
    project.file("adf-bootstrap/.backup/ou-a/scp.json", DENY_LEAVE_ORG);

    let report = project.run().await;

    assert!(report.is_success(), "{report}");
    assert_eq!(project.targets_of("adf-scp-ou-b"), vec!["o-123"]);
    assert!(project.org.policy_by_name("adf-scp-.backup/ou-a").is_none());
    assert_eq!(project.recorded(SCP), Some(vec!["adf-scp-ou-b".to_string()]));
}
