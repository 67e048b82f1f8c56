// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Isolated config and data homes for one test.
struct Home {
    config: tempfile::TempDir,
    data: tempfile::TempDir,
}

impl Home {
    fn new() -> Self {
        Self {
            config: tempfile::tempdir().unwrap(),
            data: tempfile::tempdir().unwrap(),
        }
    }

    fn config_file(&self) -> PathBuf {
        self.config.path().join("afisha").join("config.toml")
    }

    fn write_config(&self, content: &str) {
        let path = self.config_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write a one-event catalog next to the config and point the config at it.
    fn use_catalog(&self, events_json: &str) -> PathBuf {
        let catalog = self.config.path().join("events.json");
        fs::write(&catalog, events_json).unwrap();
        self.write_config(&format!("catalog = {:?}\n", path_str(&catalog)));
        catalog
    }

    fn afisha(&self) -> Command {
        let mut cmd: Command = cargo_bin_cmd!("afisha").into();
        cmd.env("XDG_CONFIG_HOME", self.config.path());
        cmd.env("XDG_DATA_HOME", self.data.path());
        cmd
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

const POETRY_NIGHT: &str = r#"[{"id": 100, "title": "Poetry night", "date": "5 мая", "type": "Reading", "price": "250 ₽", "venue": "Library"}]"#;

#[test]
fn fresh_install_shows_defaults() {
    let home = Home::new();
    let output = home.afisha().args(["config"]).output().unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(&path_str(&home.config_file())));

    let shown: toml::Value = toml::from_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(shown["watch"]["interval_secs"].as_integer(), Some(2));
    assert!(shown.get("catalog").is_none());
    assert!(!home.config_file().exists());
}

#[test]
fn configured_catalog_feeds_events_listing() {
    let home = Home::new();
    home.use_catalog(POETRY_NIGHT);

    home.afisha()
        .args(["events", "--type", "Reading"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Poetry night"))
        .stdout(predicate::str::contains("Органный концерт").not());
}

#[test]
fn configured_catalog_feeds_budget() {
    let home = Home::new();
    home.use_catalog(POETRY_NIGHT);

    home.afisha()
        .args(["favorites", "add", "100", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No event with ID 1 in the catalog"));

    home.afisha()
        .args(["budget", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Poetry night"))
        .stdout(predicate::str::contains("Total: 250 ₽"));

    let output = home
        .afisha()
        .args(["budget", "show", "--format", "json"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["budget"]["events"][0]["venue"], "Library");
}

#[test]
fn config_show_echoes_catalog_path() {
    let home = Home::new();
    let catalog = home.use_catalog(POETRY_NIGHT);

    home.afisha()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path_str(&catalog)));
}

#[test]
fn missing_catalog_file_is_reported() {
    let home = Home::new();
    home.write_config("catalog = \"/nonexistent/events.json\"\n");

    home.afisha()
        .args(["budget", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to read catalog from /nonexistent/events.json",
        ));
}

#[test]
fn invalid_catalog_json_is_reported() {
    let home = Home::new();
    let catalog = home.use_catalog("{ not a list }");

    home.afisha()
        .args(["events"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "Failed to parse catalog from {}",
            path_str(&catalog)
        )));
}

#[test]
fn malformed_config_fails_with_its_path() {
    let home = Home::new();
    home.write_config("[watch]\ninterval_secs = \"soon\"\n");

    home.afisha()
        .args(["events"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config from"))
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn zero_watch_interval_still_polls() {
    let home = Home::new();
    home.write_config("[watch]\ninterval_secs = 0\n");

    // A zero interval is raised to one second, so a single cycle finishes.
    home.afisha()
        .args(["watch", "--cycles", "1"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("You have no favorite events"));
}

#[test]
fn edit_writes_defaults_once() {
    let home = Home::new();

    home.afisha()
        .env("VISUAL", "true")
        .args(["config", "edit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created default config"));

    let written = fs::read_to_string(home.config_file()).unwrap();
    let parsed: toml::Value = toml::from_str(&written).unwrap();
    assert_eq!(parsed["watch"]["interval_secs"].as_integer(), Some(2));

    home.write_config("[watch]\ninterval_secs = 9\n");
    home.afisha()
        .env("VISUAL", "true")
        .args(["config", "edit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created default config").not());

    assert_eq!(
        fs::read_to_string(home.config_file()).unwrap(),
        "[watch]\ninterval_secs = 9\n"
    );
}

#[test]
fn edit_reports_failing_editor() {
    let home = Home::new();

    home.afisha()
        .env("VISUAL", "false")
        .args(["config", "edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Editor 'false' exited with"));
}
