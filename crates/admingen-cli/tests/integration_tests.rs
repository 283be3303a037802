//! Integration tests for the admingen binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn admingen() -> Command {
    Command::cargo_bin("admingen").expect("binary builds")
}

#[test]
fn help_lists_subcommands() {
    admingen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_matches_cargo() {
    admingen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_demo_prints_fixture_entities() {
    admingen()
        .args(["list", "--demo", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category"))
        .stdout(predicate::str::contains("Order"))
        .stdout(predicate::str::contains("Tag"));
}

#[test]
fn generate_dry_run_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    admingen()
        .args(["generate", "--demo", "--dry-run", "--yes", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));
    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn generate_demo_writes_artifact_tree() {
    let out = tempfile::tempdir().unwrap();
    admingen()
        .args(["generate", "--demo", "--yes", "--output"])
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("src/controllers/order.rs").exists());
    assert!(out.path().join("src/controllers/prelude.rs").exists());
    assert!(out.path().join("templates/category/edit.html").exists());
}

#[test]
fn generate_single_entity_only_writes_that_entity() {
    let out = tempfile::tempdir().unwrap();
    admingen()
        .args(["generate", "Order", "--demo", "--yes", "--output"])
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("src/controllers/order.rs").exists());
    assert!(!out.path().join("src/controllers/post.rs").exists());
}

#[test]
fn generate_unknown_entity_fails_with_not_found_exit_code() {
    let out = tempfile::tempdir().unwrap();
    admingen()
        .args(["generate", "Ghost", "--demo", "--yes", "--output"])
        .arg(out.path())
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Ghost"));
}

#[test]
fn generate_without_schema_source_fails() {
    let out = tempfile::tempdir().unwrap();
    // Point config lookup away from any developer config file.
    admingen()
        .args(["generate", "--yes", "--output"])
        .arg(out.path())
        .env("XDG_CONFIG_HOME", out.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--schemas"));
}

#[test]
fn completions_emit_bash_script() {
    admingen()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admingen"));
}

#[test]
fn config_path_prints_a_path() {
    admingen()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}
