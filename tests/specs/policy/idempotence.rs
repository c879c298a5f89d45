//! Repeated runs converge and stay converged

use crate::prelude::*;

#[tokio::test]
async fn second_run_makes_no_structural_changes() {
    let project = Project::new();
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);
    project.file(
        "adf-policies/scp/guardrails.json",
        &definition("guardrails", &["ou-a", "ou-b"], DENY_LEAVE_ORG),
    );
    project.run().await;
    let attachments = (project.targets_of("adf-scp-ou-b"), project.targets_of("guardrails"));
    project.org.clear_calls();

    project.run().await;

    assert_eq!(
        project.policy_mutations(),
        vec![OrgCallKind::UpdatePolicy, OrgCallKind::UpdatePolicy]
    );
    assert_eq!(
        (project.targets_of("adf-scp-ou-b"), project.targets_of("guardrails")),
        attachments
    );
}

#[tokio::test]
async fn deleting_a_file_removes_its_policy_next_run() {
    let project = Project::new();
    project.file("adf-bootstrap/ou-a/scp.json", DENY_LEAVE_ORG);
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);
    project.run().await;
    assert_eq!(project.org.policy_names(SCP).len(), 2);

    project.remove("adf-bootstrap/ou-a/scp.json");
    project.run().await;

    assert!(project.org.policy_by_name("adf-scp-ou-a").is_none());
    assert_eq!(project.targets_of("adf-scp-ou-b"), vec!["o-123"]);
    assert_eq!(project.recorded(SCP), Some(vec!["adf-scp-ou-b".to_string()]));
}

#[tokio::test]
async fn retargeting_moves_attachments() {
    let project = Project::new();
    project.file("adf-policies/scp/g.json", &definition("guardrails", &["ou-a"], DENY_LEAVE_ORG));
    project.run().await;

    project.file("adf-policies/scp/g.json", &definition("guardrails", &["ou-b"], DENY_LEAVE_ORG));
    project.run().await;

    assert_eq!(project.targets_of("guardrails"), vec!["o-123"]);
}
