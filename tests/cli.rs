// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! End-to-end tests for the clens binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn init_repo(dir: &Path) -> git2::Repository {
    let repo = git2::Repository::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    repo
}

fn commit_all(repo: &git2::Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = repo.signature().unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

fn clens() -> Command {
    Command::cargo_bin("clens").unwrap()
}

#[test]
fn analyze_worktree_suggests_commit() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("base.ts"), "export const a = 1;\n").unwrap();
    commit_all(&repo, "initial");

    fs::write(
        dir.path().join("feature.ts"),
        "export function added() {}\n",
    )
    .unwrap();

    clens()
        .args(["-C"])
        .arg(dir.path())
        .args(["analyze", "--worktree", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Suggested commit:"))
        .stdout(predicate::str::contains("feature.ts"));
}

#[test]
fn analyze_commits_reports_breaking_removal() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    fs::write(
        dir.path().join("api.ts"),
        "export function old() {}\nexport function keep() {}\n",
    )
    .unwrap();
    commit_all(&repo, "initial");
    fs::write(dir.path().join("api.ts"), "export function keep() {}\n").unwrap();
    commit_all(&repo, "remove old export");

    clens()
        .args(["-C"])
        .arg(dir.path())
        .args(["analyze", "HEAD^", "HEAD", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"breaking\": true"))
        .stdout(predicate::str::contains("BREAKING CHANGE"));
}

#[test]
fn analyze_json_has_summary_shape() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("readme.md"), "# Hello\n").unwrap();
    commit_all(&repo, "initial");
    fs::write(dir.path().join("readme.md"), "# Hello\n\nMore.\n").unwrap();

    let output = clens()
        .args(["-C"])
        .arg(dir.path())
        .args(["analyze", "--worktree", "HEAD", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["totalChanges"], 1);
    assert_eq!(parsed["summary"]["breakdown"]["docs"], 1);
    assert_eq!(parsed["changes"][0]["path"], "readme.md");
}

#[test]
fn analyze_respects_rules_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("base.ts"), "export const a = 1;\n").unwrap();
    commit_all(&repo, "initial");

    fs::write(
        dir.path().join("clens.yml"),
        "rules:\n  - id: scripts-are-feat\n    match: \"**/*.ts\"\n    type: feat\n",
    )
    .unwrap();
    fs::write(dir.path().join("util.ts"), "const x = 1;\n").unwrap();

    clens()
        .args(["-C"])
        .arg(dir.path())
        .arg("analyze")
        .arg("--worktree")
        .arg("HEAD")
        .arg("--rules")
        .arg(dir.path().join("clens.yml"))
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scripts-are-feat"));
}

#[test]
fn init_writes_starter_rules() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());

    clens()
        .args(["-C"])
        .arg(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("clens.yml"));

    let written = fs::read_to_string(dir.path().join("clens.yml")).unwrap();
    assert!(written.contains("rules:"));

    // Second run without --force must not overwrite.
    clens()
        .args(["-C"])
        .arg(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn version_prints_crate_version() {
    clens()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clens"));
}

#[test]
fn analyze_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    clens()
        .args(["-C"])
        .arg(dir.path())
        .args(["analyze", "--worktree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
