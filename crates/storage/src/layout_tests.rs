// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use adf_core::test_support::strategies::{arb_ou_path, arb_policy_type};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const SCP_BODY: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Deny","Action":"*","Resource":"*"}]}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn definition(name: &str, targets: &str) -> String {
    format!(
        r#"{{"Version":"2022-10-14","PolicyName":"{name}","Targets":{targets},"Policy":{SCP_BODY}}}"#
    )
}

#[yare::parameterized(
    root          = { "scp.json",                            Some("/") },
    root_dotted   = { "./scp.json",                          Some("/") },
    single_ou     = { "deployment/scp.json",                 Some("deployment") },
    nested_ou     = { "deployment/banking/scp.json",         Some("deployment/banking") },
    wrong_file    = { "deployment/tagging-policy.json",      None },
    parent_escape = { "../scp.json",                         None },
)]
fn legacy_scp_target_paths(relative: &str, expected: Option<&str>) {
    assert_eq!(
        legacy_target_path(Path::new(relative), PolicyType::ServiceControl).as_deref(),
        expected
    );
}

#[test]
fn legacy_tagging_target_path() {
    let path = Path::new("banking/prod/tagging-policy.json");
    assert_eq!(legacy_target_path(path, PolicyType::Tagging).as_deref(), Some("banking/prod"));
    assert_eq!(legacy_target_path(path, PolicyType::ServiceControl), None);
}

#[test]
fn legacy_names_carry_type_prefix() {
    assert_eq!(legacy_policy_name(PolicyType::ServiceControl, "ou-b"), "adf-scp-ou-b");
    assert_eq!(legacy_policy_name(PolicyType::Tagging, "/"), "adf-tagging-policy-/");
}

proptest! {
    #[test]
    fn legacy_name_is_stable(policy_type in arb_policy_type(), ou in arb_ou_path()) {
        let file = format!("{ou}/{}", policy_type.legacy_file_name());
        let first = legacy_target_path(Path::new(&file), policy_type).map(|t| legacy_policy_name(policy_type, &t));
        let second = legacy_target_path(Path::new(&file), policy_type).map(|t| legacy_policy_name(policy_type, &t));
        prop_assert!(first.is_some());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn distinct_legacy_paths_yield_distinct_names(
        policy_type in arb_policy_type(),
        a in arb_ou_path(),
        b in arb_ou_path(),
    ) {
        prop_assume!(a != b);
        let name = |ou: &str| {
            let file = format!("{ou}/{}", policy_type.legacy_file_name());
            legacy_target_path(Path::new(&file), policy_type).map(|t| legacy_policy_name(policy_type, &t))
        };
        prop_assert_ne!(name(&a), name(&b));
    }
}

#[test]
fn load_definitions_reads_sorted_json_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "b.json", &definition("deny-s3", r#"["/deployment", "123456789012"]"#));
    write(tmp.path(), "a.json", &definition("deny-root", r#""/""#));
    write(tmp.path(), "notes.txt", "ignored");

    let docs = load_definitions(tmp.path(), PolicyType::ServiceControl).unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["deny-root", "deny-s3"]);
    assert_eq!(docs[0].targets, vec!["/"]);
    assert_eq!(docs[1].targets, vec!["/deployment", "123456789012"]);
    assert!(!docs[1].source.is_legacy());
    assert_eq!(docs[1].body["Version"], "2012-10-17");
}

#[test]
fn load_definitions_missing_dir_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("scp");
    let err = load_definitions(&missing, PolicyType::ServiceControl).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(p) if p == missing));
}

#[test]
fn load_definitions_empty_dir_is_empty() {
    let tmp = TempDir::new().unwrap();
    assert!(load_definitions(tmp.path(), PolicyType::Tagging).unwrap().is_empty());
}

#[yare::parameterized(
    wrong_version  = { r#"{"Version":"2020-01-01","PolicyName":"p","Targets":[],"Policy":{}}"# },
    empty_name     = { r#"{"Version":"2022-10-14","PolicyName":" ","Targets":[],"Policy":{}}"# },
    policy_string  = { r#"{"Version":"2022-10-14","PolicyName":"p","Targets":[],"Policy":"x"}"# },
    unknown_key    = { r#"{"Version":"2022-10-14","PolicyName":"p","Policy":{},"Extra":1}"# },
    missing_policy = { r#"{"Version":"2022-10-14","PolicyName":"p"}"# },
)]
fn invalid_definitions_are_rejected(content: &str) {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "bad.json", content);
    let err = load_definitions(tmp.path(), PolicyType::ServiceControl).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDefinition { .. }), "got {err:?}");
}

#[test]
fn malformed_json_is_reported_with_path() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "broken.json", "{ not json");
    let err = load_definitions(tmp.path(), PolicyType::ServiceControl).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn load_legacy_walks_bootstrap_tree() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "scp.json", SCP_BODY);
    write(tmp.path(), "deployment/scp.json", SCP_BODY);
    write(tmp.path(), "deployment/banking/scp.json", SCP_BODY);
    write(tmp.path(), "deployment/tagging-policy.json", "{}");
    write(tmp.path(), "deployment/global.yml", "regions: []");

    let docs = load_legacy(tmp.path(), PolicyType::ServiceControl).unwrap();
    let pairs: Vec<(&str, &str)> =
        docs.iter().map(|d| (d.name.as_str(), d.targets[0].as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            ("adf-scp-deployment/banking", "deployment/banking"),
            ("adf-scp-deployment", "deployment"),
            ("adf-scp-/", "/"),
        ]
    );
    assert!(docs.iter().all(|d| d.source.is_legacy()));
}

#[test]
fn load_legacy_without_bootstrap_dir_is_empty() {
    let tmp = TempDir::new().unwrap();
    let docs = load_legacy(&tmp.path().join("adf-bootstrap"), PolicyType::Tagging).unwrap();
    assert!(docs.is_empty());
}

#[test]
fn duplicate_names_are_rejected() {
    let docs = vec![
        adf_core::test_support::definition("deny", PolicyType::ServiceControl, &["/"]),
        adf_core::test_support::legacy_scp("ou-a"),
        adf_core::test_support::definition("deny", PolicyType::ServiceControl, &["/ou-a"]),
    ];
    let err = ensure_unique_names(&docs).unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePolicy { ref name, .. } if name == "deny"));
    assert!(ensure_unique_names(&docs[..2]).is_ok());
}

#[test]
fn load_legacy_skips_hidden_directories() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ou-b/scp.json", SCP_BODY);
    write(tmp.path(), ".backup/ou-b/scp.json", SCP_BODY);
    write(tmp.path(), ".git/scp.json", SCP_BODY);
    write(tmp.path(), "ou-b/.old/scp.json", SCP_BODY);

    let docs = load_legacy(tmp.path(), PolicyType::ServiceControl).unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["adf-scp-ou-b"]);
}

#[test]
fn load_definitions_skips_hidden_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "deny.json", &definition("deny", r#""/""#));
    write(tmp.path(), ".deny.json", &definition("deny-draft", r#""/""#));

    let docs = load_definitions(tmp.path(), PolicyType::ServiceControl).unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["deny"]);
}

#[test]
fn glob_characters_in_bootstrap_dir_are_literal() {
    let tmp = TempDir::new().unwrap();
    let bootstrap = tmp.path().join("adf-[bootstrap]*");
    write(&bootstrap, "ou-a/scp.json", SCP_BODY);

    let docs = load_legacy(&bootstrap, PolicyType::ServiceControl).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].targets, vec!["ou-a"]);
}

#[test]
fn legacy_file_outside_bootstrap_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "elsewhere/scp.json", SCP_BODY);
    let bootstrap = tmp.path().join("adf-bootstrap");

    let err = legacy_document(
        &bootstrap,
        tmp.path().join("elsewhere/scp.json"),
        PolicyType::ServiceControl,
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::InvalidDefinition { ref path, .. } if path.ends_with("elsewhere/scp.json")));
}

#[cfg(unix)]
#[test]
fn unreadable_legacy_directory_is_an_error() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ou-a/scp.json", SCP_BODY);
    write(tmp.path(), "locked/ou-b/scp.json", SCP_BODY);
    let locked = tmp.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Privileged users read through the mode bits
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = load_legacy(tmp.path(), PolicyType::ServiceControl);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let err = result.unwrap_err();
    assert!(matches!(err, StoreError::Io { ref path, .. } if path.starts_with(&locked)), "got {err:?}");
}
