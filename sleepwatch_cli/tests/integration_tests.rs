//! Integration tests for the sleepwatch binary.
//!
//! These tests verify end-to-end behavior including:
//! - Configuration loading and environment overrides
//! - Dry runs against the built-in mock nights
//! - Webhook smoke testing

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create an isolated working directory with an empty config file
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
    temp_dir
}

/// Helper to get the CLI binary, isolated from the host environment
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sleepwatch"));
    cmd.env_clear()
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(temp_dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Poor-night sleep alerts from your sleep tracker",
        ));
}

#[test]
fn test_dry_run_reports_streak_alert() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sleep Streak Alert"))
        .stdout(predicate::str::contains("\"streak\": 2"))
        .stdout(predicate::str::contains("Dry run completed"));
}

#[test]
fn test_dry_run_respects_streak_env() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .env("POOR_NIGHTS_STREAK", "3")
        .arg("dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Poor Sleep Alert"))
        .stdout(predicate::str::contains(
            "Score: 65, Total: 320 min, Latency: 45 min.",
        ));
}

#[test]
fn test_dry_run_good_night_with_lenient_thresholds() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        r#"
[thresholds]
score_threshold = 50
min_total_sleep_min = 300
max_sleep_latency_min = 60
"#,
    )
    .unwrap();

    cli(&temp_dir)
        .arg("dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("no alert would be sent"))
        .stdout(predicate::str::contains("No alert: score 65, total 320 min."));
}

#[test]
fn test_dotenv_file_is_loaded() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join(".env"), "POOR_NIGHTS_STREAK=5\n").unwrap();

    cli(&temp_dir)
        .arg("dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("streak escalates at  5"))
        .stdout(predicate::str::contains("Poor Sleep Alert"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = setup_test_dir();
    Command::new(assert_cmd::cargo::cargo_bin!("sleepwatch"))
        .env_clear()
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(temp_dir.path().join("nope.toml"))
        .arg("dry-run")
        .assert()
        .failure();
}

#[test]
fn test_webhook_without_url_prints_payload() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("test-webhook")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would notify:"))
        .stdout(predicate::str::contains("Oura Sleep Alert"));
}

#[test]
fn test_webhook_posts_sample() {
    let temp_dir = setup_test_dir();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/hook")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "title": "Oura Sleep Alert",
            "meta": { "total_sleep_min": 325 }
        })))
        .with_status(204)
        .create();

    cli(&temp_dir)
        .env("POKE_WEBHOOK_URL", format!("{}/hook", server.url()))
        .arg("test-webhook")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test webhook status: 204"));

    mock.assert();
}
