//! Provider limits are checked before anything changes

use crate::prelude::*;

#[tokio::test]
async fn attachment_ceiling_is_checked_before_attaching() {
    let project = Project::new();
    let full = project.org.seed_aws_managed("FullAWSAccess", SCP);
    project.org.seed_attachment(&full, "o-123");
    for i in 0..4 {
        let id = project.org.seed_policy(&format!("team-{i}"), SCP, DENY_LEAVE_ORG);
        project.org.seed_attachment(&id, "o-123");
    }
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);

    let report = project.run().await;

    let outcome = report.outcome(SCP).map(ToString::to_string).unwrap_or_default();
    assert!(outcome.contains("target o-123 would have 6"), "{outcome}");
    assert!(project.policy_mutations().is_empty());
    assert_eq!(project.org.count(OrgCallKind::AttachPolicy), 0);
}

#[tokio::test]
async fn oversized_policy_is_rejected() {
    let project = Project::new();
    let statements: Vec<String> = (0..200)
        .map(|i| format!(r#"{{"Sid": "Deny{i:04}", "Effect": "Deny", "Action": "s3:*", "Resource": "*"}}"#))
        .collect();
    let body = format!(r#"{{"Version": "2012-10-17", "Statement": [{}]}}"#, statements.join(","));
    project.file("adf-bootstrap/ou-a/scp.json", &body);

    let report = project.run().await;

    let outcome = report.outcome(SCP).map(ToString::to_string).unwrap_or_default();
    assert!(outcome.contains("limited to 5120"), "{outcome}");
    assert!(project.org.policy_names(SCP).is_empty());
}
