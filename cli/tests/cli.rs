use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;

const OLD_MESSAGE: &str = "Subject: Invoice 2020-01\r\n\
Date: Wed, 15 Jan 2020 09:30:00 +0000\r\n\
From: billing@example.com\r\n\
\r\n\
Thanks for your payment.\r\n";

/// A mail tree with one account, `work`, holding one old message and a
/// root-level `Archive` folder, plus a config file pointing at it.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(config: Value) -> Self {
        let dir = TempDir::new().unwrap();
        let inbox = dir.path().join("mail/work/Inbox");
        fs::create_dir_all(&inbox).unwrap();
        fs::create_dir_all(dir.path().join("mail/work/Archive")).unwrap();
        fs::write(inbox.join("0001.eml"), OLD_MESSAGE).unwrap();

        let mut config = config;
        config["mail_root"] = json!(dir.path().join("mail"));
        fs::write(
            dir.path().join("config.json"),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("inbox-archiver").unwrap();
        cmd.arg("--config")
            .arg(self.path("config.json"))
            .env_remove("RUST_LOG");
        cmd
    }
}

fn json_report(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_simulate_is_the_default() {
    let fixture = Fixture::new(json!({"version": "1.0"}));

    let output = fixture
        .command()
        .args(["--report", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_report(&output);
    assert_eq!(report["simulate"], true);
    assert_eq!(report["summary"]["simulated"], 1);
    assert_eq!(
        report["accounts"][0]["decisions"][0]["destination"],
        "2020/2020-01"
    );
    assert!(fixture.path("mail/work/Inbox/0001.eml").exists());
    assert!(!fixture.path("mail/work/Archive/2020").exists());

    let config = read_json(&fixture.path("config.json"));
    assert!(config.get("archive_paths").is_none());
}

#[test]
fn test_live_run_moves_and_remembers_archive() {
    let fixture = Fixture::new(json!({"version": "1.0", "retention_days": 30}));

    fixture
        .command()
        .args(["--live", "-q"])
        .assert()
        .success();

    assert!(!fixture.path("mail/work/Inbox/0001.eml").exists());
    assert!(fixture
        .path("mail/work/Archive/2020/2020-01/0001.eml")
        .exists());

    let config = read_json(&fixture.path("config.json"));
    assert_eq!(
        config["archive_paths"]["work"],
        json!({"type": "root", "name": "Archive"})
    );
    assert_eq!(config["retention_days"], 30);
}

#[test]
fn test_text_report_prints_summary() {
    let fixture = Fixture::new(json!({"version": "1.0"}));

    let output = fixture.command().assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();

    assert!(text.starts_with("Simulated run finished"));
    assert!(text.contains("1 simulated"));
}

#[test]
fn test_account_filter_flag() {
    let fixture = Fixture::new(json!({"version": "1.0"}));

    let output = fixture
        .command()
        .args(["--report", "json", "--account", "personal"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_report(&output);
    assert_eq!(report["accounts"][0]["outcome"], "excluded");
    assert_eq!(report["summary"]["processed"], 0);
}

#[test]
fn test_retention_override_keeps_message() {
    let fixture = Fixture::new(json!({"version": "1.0"}));

    let output = fixture
        .command()
        .args(["--report", "json", "--retention-days", "100000"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_report(&output);
    assert_eq!(report["summary"]["too_recent"], 1);
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    let output = Command::cargo_bin("inbox-archiver")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    assert!(String::from_utf8_lossy(&output).contains("Failed to load config"));
}

#[test]
fn test_invalid_config_fails() {
    let fixture = Fixture::new(json!({"version": "2.0"}));
    fixture.command().assert().failure();
}

#[test]
fn test_simulate_and_live_conflict() {
    let fixture = Fixture::new(json!({"version": "1.0"}));
    fixture
        .command()
        .args(["--simulate", "--live"])
        .assert()
        .failure();
}
