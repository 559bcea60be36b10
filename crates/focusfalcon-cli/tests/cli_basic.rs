//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory
//! and pins the clock with `--at`.

use std::path::Path;
use std::process::Command;

// Friday 2026-10-16, 10:00 UTC.
const FRIDAY_TEN: &str = "2026-10-16T10:00:00Z";
const FRIDAY_NIGHT: &str = "2026-10-16T22:00:00Z";

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusfalcon-cli"))
        .env("FOCUSFALCON_DATA_DIR", dir)
        .env_remove("FOCUSFALCON_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_init_writes_defaults_once() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["init"]);
    assert!(out.contains("blockedSites"));
    assert!(dir.path().join("focusfalcon.db").exists());
    assert!(dir.path().join("config.toml").exists());

    let out = run_ok(dir.path(), &["init"]);
    assert!(out.contains("already initialized"));
}

#[test]
fn test_sites_add_normalizes_and_rejects_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["init"]);

    let out = run_ok(dir.path(), &["sites", "add", "https://www.News.ycombinator.com/item?id=1"]);
    assert!(out.contains("news.ycombinator.com"));

    let (_, stderr, code) = run_cli(dir.path(), &["sites", "add", "Reddit.com/r/x"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already blocked"));

    let list = run_ok(dir.path(), &["sites", "list", "--json"]);
    let sites: Vec<String> = serde_json::from_str(&list).unwrap();
    assert_eq!(
        sites,
        ["youtube.com", "reddit.com", "twitter.com", "news.ycombinator.com"]
    );
}

#[test]
fn test_focus_session_blocks_until_ended() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["init"]);

    let out = run_ok(dir.path(), &["check", "https://youtube.com/watch", "--at", FRIDAY_TEN]);
    assert!(out.starts_with("allowed"));

    run_ok(dir.path(), &["focus", "start", "30", "--at", FRIDAY_TEN]);
    let out = run_ok(
        dir.path(),
        &["check", "https://m.youtube.com/", "--json", "--at", FRIDAY_TEN],
    );
    let verdict: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(verdict["block"], true);
    assert_eq!(verdict["rule"], "focus_session");

    let (_, stderr, code) = run_cli(dir.path(), &["focus", "end", "--at", FRIDAY_TEN]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--yes"));

    run_ok(dir.path(), &["focus", "end", "--yes", "--at", FRIDAY_TEN]);
    let out = run_ok(dir.path(), &["check", "https://youtube.com", "--at", FRIDAY_TEN]);
    assert!(out.starts_with("allowed"));
}

#[test]
fn test_focus_start_rejects_zero_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["focus", "start", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("at least one minute"));
}

#[test]
fn test_schedule_pause_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["init"]);
    run_ok(
        dir.path(),
        &[
            "schedule",
            "set",
            r#"{"enabled":true,"days":[5],"timeRanges":[{"start":"09:00","end":"17:00"}]}"#,
            "--at",
            FRIDAY_TEN,
        ],
    );

    let out = run_ok(dir.path(), &["check", "https://twitter.com", "--at", FRIDAY_TEN]);
    assert!(out.starts_with("blocked"));
    let out = run_ok(dir.path(), &["check", "https://twitter.com", "--at", FRIDAY_NIGHT]);
    assert!(out.starts_with("allowed"));

    let (_, stderr, code) = run_cli(dir.path(), &["pause", "--yes", "--at", FRIDAY_NIGHT]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not active"));

    run_ok(dir.path(), &["pause", "--yes", "--at", FRIDAY_TEN]);
    let out = run_ok(dir.path(), &["check", "https://twitter.com", "--at", FRIDAY_TEN]);
    assert!(out.contains("paused"));

    run_ok(dir.path(), &["resume", "--at", FRIDAY_TEN]);
    let out = run_ok(dir.path(), &["check", "https://twitter.com", "--at", FRIDAY_TEN]);
    assert!(out.starts_with("blocked"));
}

#[test]
fn test_invalid_schedule_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["schedule", "set", r#"{"enabled":true,"days":[9],"timeRanges":[]}"#],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("weekday"));
}

#[test]
fn test_rules_and_messages() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["init"]);

    let out = run_ok(dir.path(), &["rules", "--json"]);
    let rules: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rules[0]["id"], 1000);
    assert_eq!(rules[2]["condition"]["urlFilter"], "twitter.com");

    let out = run_ok(
        dir.path(),
        &["message", r#"{"type":"ENABLE_BLOCKING","sites":["x.com","y.com"]}"#],
    );
    assert_eq!(out.trim(), r#"{"ok":true}"#);
    let stored = std::fs::read_to_string(dir.path().join("rules.json")).unwrap();
    assert!(stored.contains("y.com"));

    run_ok(dir.path(), &["message", r#"{"type":"DISABLE_BLOCKING"}"#]);
    let stored: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("rules.json")).unwrap())
            .unwrap();
    assert!(stored.is_empty());

    let (out, _, code) = run_cli(dir.path(), &["message", r#"{"type":"NOPE"}"#]);
    assert_eq!(code, 1);
    assert!(out.contains(r#""ok":false"#));
}

#[test]
fn test_config_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "cache.cooldown_ms", "750"]);
    let out = run_ok(dir.path(), &["config", "get", "cache.cooldown_ms"]);
    assert_eq!(out.trim(), "750");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "cache.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_avatar_set_and_status() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["avatar", "set", "capybara"]);
    let out = run_ok(dir.path(), &["status", "--at", FRIDAY_TEN]);
    let status: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(status["avatar"], "capybara");
    assert_eq!(status["status"]["focus_active"], false);

    let (_, _, code) = run_cli(dir.path(), &["avatar", "set", "dragon"]);
    assert_eq!(code, 1);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["completions", "bash"]);
    assert!(out.contains("focusfalcon-cli"));
}
