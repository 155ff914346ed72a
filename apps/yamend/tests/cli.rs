//! End-to-end checks of the `yamend` binary: modes, previews and exit codes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const DIRTY: &str = "#cmt\nkey:   value   \n";
const FIXED: &str = "---\n# cmt\nkey: value\n";
const CLEAN: &str = "---\nx: 1\n";

fn yamend(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yamend"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn yamend")
}

/// Scratch tree with one file needing fixes and one already clean. The
/// `.git` marker keeps config discovery inside the temp dir.
fn seed(root: &Path) {
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join("a.yml"), DIRTY).unwrap();
    fs::write(root.join("b.yml"), CLEAN).unwrap();
}

fn arg(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_check_exits_one_when_fixes_pending() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let out = yamend(&["check", arg(dir.path())]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(fs::read_to_string(dir.path().join("a.yml")).unwrap(), DIRTY);
}

#[test]
fn test_check_exits_zero_on_clean_tree() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("b.yml"), CLEAN).unwrap();
    let out = yamend(&["check", arg(dir.path()), "--output", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["mode"], "dry_run");
    assert_eq!(v["files_processed"], 1);
    assert_eq!(v["files_changed"], 0);
}

#[test]
fn test_setup_errors_exit_two() {
    let dir = tempdir().unwrap();
    seed(dir.path());

    let missing = dir.path().join("missing");
    let out = yamend(&["fix", arg(&missing)]);
    assert_eq!(out.status.code(), Some(2));

    let file = dir.path().join("a.yml");
    let out = yamend(&["fix", arg(&file)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not individual files"));

    let out = yamend(&["fix", arg(dir.path()), "--exclude", "[bad"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error:"));
    // nothing was touched
    assert_eq!(fs::read_to_string(dir.path().join("a.yml")).unwrap(), DIRTY);
}

#[test]
fn test_fix_diff_previews_without_writing() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let out = yamend(&["fix", arg(dir.path()), "--diff"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("a.yml")).unwrap(), DIRTY);
    assert!(!dir.path().join("a.yml.backup").exists());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("==> a.yml\n"));
    assert!(stdout.contains("--- a/a.yml\n"));
    assert!(stdout.contains("+++ b/a.yml\n"));
    assert!(stdout.contains("+key: value"));
    assert!(stdout.contains("Mode: DRY RUN"));
}

#[test]
fn test_fix_writes_with_backup_by_default() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let out = yamend(&["fix", arg(dir.path()), "--output", "json"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("a.yml")).unwrap(), FIXED);
    assert_eq!(
        fs::read_to_string(dir.path().join("a.yml.backup")).unwrap(),
        DIRTY
    );
    assert!(!dir.path().join("b.yml.backup").exists());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["mode"], "write_with_backup");
    assert_eq!(v["files_written"], 1);
    assert_eq!(v["backups"][0], "a.yml.backup");

    // second pass is a no-op, so check passes
    let out = yamend(&["check", arg(dir.path())]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_fix_no_backup_overwrites_in_place() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let out = yamend(&["fix", arg(dir.path()), "--no-backup", "--output", "json"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("a.yml")).unwrap(), FIXED);
    assert!(!dir.path().join("a.yml.backup").exists());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["mode"], "write_without_backup");
    assert_eq!(v["files_written"], 1);
    assert!(v["backups"].as_array().unwrap().is_empty());
}

#[test]
fn test_version_prints_crate_version() {
    let out = yamend(&["version"]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}
