#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// `timeclock` with HOME and the config path pinned inside `dir`.
fn timeclock(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("timeclock").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("TIMECLOCK_CONFIG", config_path(dir))
        .env_remove("RAGIC_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn config_path(dir: &TempDir) -> PathBuf {
    dir.path().join("config.yaml")
}

fn write_config(dir: &TempDir, yaml: &str) {
    std::fs::write(config_path(dir), yaml).unwrap();
}

// ---------------------------------------------------------------------------
// timeclock config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_defaults() {
    let dir = TempDir::new().unwrap();
    timeclock(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let written = std::fs::read_to_string(config_path(&dir)).unwrap();
    assert!(written.contains("lynvolunteer/lyn-temp/55"));
    assert!(written.contains("America/Los_Angeles"));
}

#[test]
fn config_init_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "members:\n  id_prefix: VOL\n");
    timeclock(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let kept = std::fs::read_to_string(config_path(&dir)).unwrap();
    assert_eq!(kept, "members:\n  id_prefix: VOL\n");
}

#[test]
fn config_show_masks_api_key() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "ragic:\n  api_key: s3cret-key\n");
    timeclock(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("s3cret-key").not());
}

#[test]
fn config_show_json_fills_defaults() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "clock:\n  min_dwell_minutes: 15\n");
    let output = timeclock(&dir)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["clock"]["min_dwell_minutes"], 15);
    assert_eq!(json["clock"]["time_format"], "%H:%M");
    assert_eq!(json["members"]["id_prefix"], "LYN");
}

#[test]
fn env_api_key_overrides_file() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "server:\n  port: 5000\n");
    let output = timeclock(&dir)
        .env("RAGIC_API_KEY", "from-env")
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ragic"]["api_key"], "********");
}

#[test]
fn config_validate_passes_with_key() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "ragic:\n  api_key: k\n");
    timeclock(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_warns_without_key() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "server:\n  port: 5000\n");
    timeclock(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"));
}

#[test]
fn config_validate_fails_on_unknown_timezone() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "ragic:\n  api_key: k\nclock:\n  timezone: Mars/Olympus\n");
    timeclock(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    timeclock(&dir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

// ---------------------------------------------------------------------------
// timeclock qr
// ---------------------------------------------------------------------------

#[test]
fn qr_prints_code_and_id() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "members:\n  id_prefix: LYN\n");
    timeclock(&dir)
        .args(["qr", "LYN123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LYN123"));
}

#[test]
fn qr_rejects_foreign_id() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "members:\n  id_prefix: LYN\n");
    timeclock(&dir)
        .args(["qr", "XYZ123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid member id"));
}

// ---------------------------------------------------------------------------
// Remote commands
// ---------------------------------------------------------------------------

#[test]
fn log_hours_validates_id_before_network() {
    let dir = TempDir::new().unwrap();
    // Nothing listens here; a network attempt would fail with a different error.
    write_config(
        &dir,
        "ragic:\n  base_url: http://127.0.0.1:9\n  api_key: k\n",
    );
    timeclock(&dir)
        .args(["log-hours", "ABC1", "--event", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid member id"));
}

#[test]
fn log_hours_requires_api_key() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "server:\n  port: 5000\n");
    timeclock(&dir)
        .args(["log-hours", "LYN1", "--event", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing API key"));
}

#[test]
fn member_prints_name_from_ragic() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/lynvolunteer/lyn-temp/53")
        .match_query(mockito::Matcher::Any)
        .with_body(r#"{"7": {"Full Name": "Ada Lovelace"}}"#)
        .create();

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        &format!("ragic:\n  base_url: {}\n  api_key: k\n", server.url()),
    );
    timeclock(&dir)
        .args(["member", "LYN123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"));
}

#[test]
fn events_lists_open_signups() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/lynvolunteer/lyn-temp/9")
        .match_query(mockito::Matcher::Any)
        .with_body(
            r#"{"3": {"Opportunity": "Park Cleanup", "Event ID": 7, "EID": "E-3"},
                "12": {"Opportunity": "Food Bank", "Event ID": "42", "EID": "E-12"}}"#,
        )
        .create();

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        &format!("ragic:\n  base_url: {}\n  api_key: k\n", server.url()),
    );
    timeclock(&dir)
        .args(["events", "LYN123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Park Cleanup"))
        .stdout(predicate::str::contains("Food Bank"))
        .stdout(predicate::str::contains("E-12"));
}

#[test]
fn remote_error_is_reported() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", mockito::Matcher::Any)
        .with_status(401)
        .with_body("unauthorized")
        .create();

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        &format!("ragic:\n  base_url: {}\n  api_key: wrong\n", server.url()),
    );
    timeclock(&dir)
        .args(["member", "LYN123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("401"));
}
