//! Integration tests for the `tapcast` CLI binary.
//!
//! These tests cover argument parsing, help output, shell completions,
//! card bookkeeping and config errors, all without a Plex server or Roku.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tapcast` binary with env isolation.
///
/// Clears the `TAPCAST_*` variables this suite could trip over and points
/// config directories at a nonexistent path so tests never touch the
/// user's real configuration.
fn tapcast_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tapcast");
    cmd.env("HOME", "/tmp/tapcast-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tapcast-cli-test-nonexistent")
        .env_remove("TAPCAST_CONFIG")
        .env_remove("TAPCAST_PLEX__HOST")
        .env_remove("TAPCAST_PLEX__TOKEN")
        .env_remove("TAPCAST_ROKU__HOST")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const CARDS: &str = r#"
[cards.04A1B2]
type = "show"
title = "Example Show"
mode = "shuffle"

[cards.0badf00d]
type = "movie"
title = "Heat"
"#;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tapcast_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tapcast_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("NFC")
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("register"))
            .and(predicate::str::contains("cards")),
    );
}

#[test]
fn test_version_flag() {
    tapcast_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tapcast"));
}

#[test]
fn test_unknown_play_mode_is_usage_error() {
    let output = tapcast_cmd()
        .args(["play", "show", "Example Show", "--mode", "random"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tapcast_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tapcast_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tapcast"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[plex]\nhost = \"plex.local\"\ntoken = \"s3cret\"\n");
    tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("plex.local").and(predicate::str::contains("s3cret").not()),
        );
}

#[test]
fn test_run_without_plex_host_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = tapcast_cmd()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("run")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("plex.host"), "Expected field name in:\n{text}");
}

// ── Cards ───────────────────────────────────────────────────────────

#[test]
fn test_cards_list_plain() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), CARDS);
    tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["cards", "list", "--output", "plain"])
        .assert()
        .success()
        .stdout("04A1B2\n0badf00d\n");
}

#[test]
fn test_cards_list_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), CARDS);
    let output = tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["cards", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cards: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cards[0]["uid"], "04A1B2");
    assert_eq!(cards[0]["type"], "show");
    assert_eq!(cards[0]["mode"], "shuffle");
    assert_eq!(cards[1]["title"], "Heat");
}

#[test]
fn test_cards_remove_with_yes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), CARDS);
    tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["cards", "remove", "0badf00d", "--yes"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(!saved.contains("Heat"));
    assert!(saved.contains("Example Show"));
}

#[test]
fn test_cards_remove_unknown_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), CARDS);
    let output = tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["cards", "remove", "cafe", "-y"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cards_remove_without_tty_requires_yes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), CARDS);
    let output = tapcast_cmd()
        .arg("--config")
        .arg(&path)
        .args(["cards", "remove", "0badf00d"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(std::fs::read_to_string(&path).unwrap().contains("Heat"));
}
