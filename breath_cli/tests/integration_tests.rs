//! Integration tests for the breathe binary.
//!
//! These tests verify end-to-end behavior including:
//! - Technique listing and selection
//! - Running sessions to completion and stopping early
//! - Journal, progress and export files

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// The binary with a config home that holds no config file, so the
/// developer's own settings never leak into a test run
fn cli() -> Command {
    let isolated = std::env::temp_dir().join("breathe-tests-no-config");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("breathe"));
    cmd.env("XDG_CONFIG_HOME", &isolated).env("HOME", &isolated);
    cmd
}

fn run_fast(data_dir: &Path, technique: &str) -> assert_cmd::assert::Assert {
    cli()
        .arg("run")
        .arg(technique)
        .arg("--tick-ms")
        .arg("1")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
}

fn journal_lines(data_dir: &Path) -> Vec<Value> {
    let content =
        fs::read_to_string(data_dir.join("journal/practice.wal")).expect("Failed to read journal");
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("journal line is JSON"))
        .collect()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Guided breathing practice"));
}

#[test]
fn test_list_shows_builtin_techniques() {
    cli()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Box Breathing"))
        .stdout(predicate::str::contains("4-7-8"))
        .stdout(predicate::str::contains("energizing"));
}

#[test]
fn test_dry_run_shows_plan_without_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("run")
        .arg("relaxing")
        .arg("--dry-run")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hold"))
        .stdout(predicate::str::contains("Rest").not())
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.join("journal/practice.wal").exists());
}

#[test]
fn test_run_to_completion_logs_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_fast(data_dir, "energizing")
        .success()
        .stdout(predicate::str::contains("Breathe in"))
        .stdout(predicate::str::contains("cycle 10/10"))
        .stdout(predicate::str::contains("Session complete"))
        .stdout(predicate::str::contains("+70 XP"));

    let lines = journal_lines(data_dir);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["technique_id"], "energizing");
    assert_eq!(lines[0]["completed"], true);
    assert_eq!(lines[0]["cycles_completed"], 10);
    assert_eq!(lines[0]["elapsed_seconds"], 40);

    let progress: Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("journal/progress.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(progress["total_xp"], 70);
    assert_eq!(progress["current_streak"], 1);
}

#[test]
fn test_max_seconds_stops_early() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("run")
        .arg("box")
        .arg("--tick-ms")
        .arg("1")
        .arg("--max-seconds")
        .arg("20")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopped"))
        .stdout(predicate::str::contains("stopped after 1 of 4 cycles"));

    let lines = journal_lines(data_dir);
    assert_eq!(lines[0]["completed"], false);
    assert_eq!(lines[0]["elapsed_seconds"], 20);
}

#[test]
fn test_unknown_technique_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("run")
        .arg("no-such-breath")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown technique"));
}

#[test]
fn test_zero_tick_ms_rejected() {
    cli()
        .arg("run")
        .arg("box")
        .arg("--tick-ms")
        .arg("0")
        .assert()
        .failure();
}

#[test]
fn test_history_and_stats_after_runs() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_fast(data_dir, "energizing").success();
    run_fast(data_dir, "energizing").success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("energizing"))
        .stdout(predicate::str::contains("2 sessions (2 completed)"));

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 2"))
        .stdout(predicate::str::contains("140 XP"))
        .stdout(predicate::str::contains("Favourite this week: energizing"));
}

#[test]
fn test_empty_history() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions"));
}

#[test]
fn test_history_with_huge_window() {
    let temp_dir = setup_test_dir();
    run_fast(temp_dir.path(), "energizing").success();

    cli()
        .arg("history")
        .arg("--days")
        .arg("100000000000")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 sessions (1 completed)"));
}

#[test]
fn test_history_rejects_negative_days() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--days=-3")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let csv_path = data_dir.join("export.csv");

    run_fast(data_dir, "energizing").success();

    cli()
        .arg("export")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 sessions"));

    let content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(content.contains("id,technique_id"));
    assert!(content.contains("energizing"));
}
