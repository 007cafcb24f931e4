//! Integration tests for the ktlint-cache CLI
//!
//! These drive the built binary against throwaway Kotlin projects, covering
//! the cycle of: init → format → lint → status → clean

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a ktlint-cache command
fn ktlint_cache() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("ktlint-cache"))
}

/// Helper to create a project with an `.editorconfig` root marker
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".editorconfig"), "root = true\n").unwrap();
    dir
}

/// Helper to write a file, creating parent directories
fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

/// Helper to pick one task's entry out of a JSON report
fn task_entry(report: &serde_json::Value, name: &str) -> serde_json::Value {
    report["tasks"].as_array().unwrap().iter().find(|task| task["task"] == name).unwrap().clone()
}

// =============================================================================
// BASIC COMMANDS
// =============================================================================

#[test]
fn test_version() {
    ktlint_cache()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ktlint-cache v"));
}

#[test]
fn test_version_json() {
    let output = ktlint_cache().args(["--json", "version"]).output().unwrap();
    assert!(output.status.success());
    assert!(json(&output.stdout)["version"].is_string());
}

#[test]
fn test_init_creates_config() {
    let dir = project();

    ktlint_cache()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let config = fs::read_to_string(dir.path().join(".ktlint.toml")).unwrap();
    assert!(config.contains("[report]"));

    ktlint_cache()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn test_unknown_task_fails() {
    let dir = project();

    ktlint_cache()
        .args(["lint", "--task", "nope", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// =============================================================================
// LINT AND FORMAT
// =============================================================================

#[test]
fn test_lint_reports_unfixed_problems() {
    let dir = project();
    write(dir.path(), "src/Main.kt", "import foo.*\n\nclass Main\n");

    ktlint_cache()
        .args(["lint", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("file://"))
        .stdout(predicate::str::contains("standard:no-wildcard-imports"))
        .stderr(predicate::str::contains("Ktlint lint finished with 1 errors"));

    // Still failing, so the file is checked again
    ktlint_cache()
        .args(["lint", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .code(1);
}

#[test]
fn test_format_then_lint_is_incremental() {
    let dir = project();
    write(dir.path(), "src/A.kt", "class A { }\n");
    write(dir.path(), "src/C.kt", "val c = 1  \n");

    ktlint_cache()
        .args(["-C"])
        .arg(dir.path())
        .args(["format", "--in-process"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("src/A.kt")).unwrap(), "class A\n");
    assert_eq!(fs::read_to_string(dir.path().join("src/C.kt")).unwrap(), "val c = 1\n");
    assert!(dir.path().join("build/ktlint/records/root-sha.bin").exists());

    let output = ktlint_cache()
        .args(["--json", "lint", "--in-process"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary = json(&output.stdout);
    assert_eq!(summary["passed"], true);
    let tasks = summary["tasks"].as_array().unwrap();
    assert!(!tasks.is_empty());
    for task in tasks {
        assert_eq!(task["processed"].as_array().unwrap().len(), 0);
    }
}

#[test]
fn test_format_through_worker_process() {
    let dir = project();
    write(dir.path(), "src/A.kt", "class A { }\n");
    write(dir.path(), "src/Bad.kt", "class Bad {\n");

    // Default isolation runs batches through the hidden worker subcommand
    ktlint_cache()
        .arg("format")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Bad.kt"));

    assert_eq!(fs::read_to_string(dir.path().join("src/A.kt")).unwrap(), "class A\n");
    assert_eq!(fs::read_to_string(dir.path().join("src/Bad.kt")).unwrap(), "class Bad {\n");
}

#[test]
fn test_explicit_changed_files() {
    let dir = project();
    write(dir.path(), "src/A.kt", "class A\n");
    write(dir.path(), "src/B.kt", "class B\n");

    ktlint_cache()
        .args(["format", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .success();

    write(dir.path(), "src/A.kt", "class A  \n");
    write(dir.path(), "src/B.kt", "class B  \n");

    // Only the reported file is fixed
    ktlint_cache()
        .args(["format", "--in-process", "--changed", "src/B.kt"])
        .current_dir(dir.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("src/A.kt")).unwrap(), "class A  \n");
    assert_eq!(fs::read_to_string(dir.path().join("src/B.kt")).unwrap(), "class B\n");
}

#[test]
fn test_rerun_conflicts_with_explicit_deltas() {
    let dir = project();

    ktlint_cache()
        .args(["lint", "--rerun", "--changed", "src/A.kt"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

// =============================================================================
// STATE
// =============================================================================

#[test]
fn test_status_after_format() {
    let dir = project();
    write(dir.path(), "src/A.kt", "class A { }\n");
    write(dir.path(), "src/B.kt", "class B\n");

    ktlint_cache()
        .args(["format", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .success();

    let output = ktlint_cache()
        .args(["--json", "status", "--task", "root"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let root = task_entry(&json(&output.stdout), "root");
    assert_eq!(root["has_record"], true);
    assert_eq!(root["fingerprints"], 2);
    assert_eq!(root["live_files"], 2);
    assert_eq!(root["up_to_date"], true);
    assert_eq!(root["changed_paths"], serde_json::json!(["src/A.kt"]));

    write(dir.path(), "src/B.kt", "class B2\n");
    ktlint_cache()
        .arg("status")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("root (stale)"));
}

#[test]
fn test_status_after_failed_lint_is_stale() {
    let dir = project();
    write(dir.path(), "src/Main.kt", "import foo.*\n\nclass Main\n");

    ktlint_cache()
        .args(["lint", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .code(1);

    let output = ktlint_cache()
        .args(["--json", "status", "--task", "root"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    // The record matches the files on disk, but the next lint still checks them
    let root = task_entry(&json(&output.stdout), "root");
    assert_eq!(root["has_record"], true);
    assert_eq!(root["up_to_date"], false);
}

#[test]
fn test_clean_forgets_state() {
    let dir = project();
    write(dir.path(), "src/A.kt", "class A\n");

    ktlint_cache()
        .args(["format", "--in-process"])
        .current_dir(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("build/ktlint/records/root-sha.bin").exists());

    ktlint_cache()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert!(!dir.path().join("build/ktlint/records/root-sha.bin").exists());
    assert!(!dir.path().join("build/ktlint/history/root.json").exists());

    ktlint_cache()
        .arg("status")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("root (no record)"));
}
