//! Records written by the path-list format are migrated on the next run

use crate::prelude::*;

#[tokio::test]
async fn legacy_record_is_read_and_rewritten() {
    let project = Project::new();
    let old = project.org.seed_policy("adf-scp-ou-a", SCP, DENY_LEAVE_ORG);
    project.org.seed_attachment(&old, "o-122");
    project.params.set("scp", "['./ou-a/scp.json', './ou-b/scp.json']");
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);

    let report = project.run().await;

    assert!(report.is_success(), "{report}");
    assert!(project.org.policy_by_name("adf-scp-ou-a").is_none());
    similar_asserts::assert_eq!(
        project.params.value("scp").as_deref(),
        Some(r#"{"v":1,"policies":["adf-scp-ou-b"]}"#)
    );
}

#[tokio::test]
async fn record_from_newer_release_aborts() {
    let project = Project::new();
    project.params.set("scp", r#"{"v":2,"policies":[]}"#);
    project.file("adf-bootstrap/ou-b/scp.json", DENY_LEAVE_ORG);

    let report = project.run().await;

    assert!(!report.is_success());
    assert!(project.policy_mutations().is_empty());
    assert_eq!(project.params.value("scp").as_deref(), Some(r#"{"v":2,"policies":[]}"#));
}
