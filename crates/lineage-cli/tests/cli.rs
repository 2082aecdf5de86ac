//! End-to-end tests for the lineage binary

use assert_cmd::Command;
use predicates::prelude::*;

fn lineage() -> Command {
    Command::cargo_bin("lineage").expect("binary builds")
}

#[test]
fn test_demo_scene_report() {
    lineage()
        .assert()
        .success()
        .stdout(predicate::str::contains("Branch points:"))
        .stdout(predicate::str::contains("Time taken "))
        .stdout(predicate::str::contains("Parent chain:"))
        .stdout(predicate::str::contains("Edges of graph:"))
        // The demo scene diverges at the button and at the outer host
        .stdout(predicate::str::contains("[branch(1)]"))
        .stdout(predicate::str::contains("[branch(2)]"));
}

#[test]
fn test_scene_file_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scene.json");
    std::fs::write(
        &path,
        r#"{
            "nodes": [
                {"label": "c", "widget": "window", "kind": "element"},
                {"label": "b", "widget": "panel", "kind": "element", "parent": "c"},
                {"label": "a", "widget": "button", "kind": "element", "parent": "b"}
            ],
            "target": "a"
        }"#,
    )
    .expect("write scene");

    lineage()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("edges=2"))
        .stdout(predicate::str::is_match("(?s)Parent chain:\n.*element@2.*element@1.*element@0").unwrap());
}

#[test]
fn test_target_override() {
    lineage()
        .args(["--target", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("element@"));
}

#[test]
fn test_unknown_target_fails() {
    lineage()
        .args(["--target", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no node labelled"));
}

#[test]
fn test_malformed_scene_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scene.json");
    std::fs::write(&path, "{ not json }").expect("write scene");

    lineage()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load scene"));
}
