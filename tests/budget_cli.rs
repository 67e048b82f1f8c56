// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

use afisha::budget::TicketCategory;
use afisha::storage::Storage;

fn afisha_with_db(config_home: &Path, data_home: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("afisha").into();
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd.env("XDG_DATA_HOME", data_home);
    cmd
}

fn open_storage(data_home: &Path) -> Storage {
    let db_dir = data_home.join("afisha");
    std::fs::create_dir_all(&db_dir).unwrap();
    Storage::open_path(&db_dir.join("afisha.db")).unwrap()
}

/// Favorites 1, 2 and 3 of the built-in catalog ("500 ₽", "0 ₽", "1 000 ₽")
/// with a student ticket.
fn seed_student_selection(data_home: &Path, planned: u64) {
    let storage = open_storage(data_home);
    for id in [1, 2, 3] {
        storage.add_favorite(id).unwrap();
    }
    storage
        .set_active_category(TicketCategory::Student)
        .unwrap();
    storage.set_planned_budget(planned).unwrap();
}

fn budget_json(config_home: &Path, data_home: &Path) -> serde_json::Value {
    let output = afisha_with_db(config_home, data_home)
        .args(["budget", "show", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    serde_json::from_str(&stdout).expect("not valid JSON")
}

#[test]
fn budget_without_favorites_shows_message() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no favorite events"));
}

#[test]
fn bare_command_shows_budget() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1050 ₽"));
}

#[test]
fn budget_terminal_shows_discounted_prices() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 1500);

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "show", "--format", "terminal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Вечер камерной музыки"))
        .stdout(predicate::str::contains("500 ₽ → 350 ₽"))
        .stdout(predicate::str::contains("Total: 1050 ₽"))
        .stdout(predicate::str::contains("Used 70% of budget. 450 ₽ left."));
}

#[test]
fn budget_json_student_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    let parsed = budget_json(tmp.path(), data.path());
    let finals: Vec<_> = parsed["budget"]["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["final_price"].as_u64().unwrap())
        .collect();

    assert_eq!(finals, vec![350, 0, 700]);
    assert_eq!(parsed["budget"]["total"], 1050);
    assert_eq!(parsed["analytics"]["paid_count"], 2);
    assert_eq!(parsed["analytics"]["free_count"], 1);
    assert_eq!(parsed["analytics"]["average_price"], 525);
    assert!(parsed["progress"].is_null());
}

#[test]
fn budget_json_over_plan_is_error() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 1000);

    let parsed = budget_json(tmp.path(), data.path());
    assert_eq!(parsed["recommendations"][0]["kind"], "error");
    assert!(
        parsed["recommendations"][0]["text"]
            .as_str()
            .unwrap()
            .contains("50 ₽")
    );
}

#[test]
fn budget_json_keeps_catalog_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    let parsed = budget_json(tmp.path(), data.path());
    assert_eq!(
        parsed["budget"]["events"][1]["venue"],
        "Музей современного искусства"
    );
}

#[test]
fn budget_json_validates_against_schema() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 1200);

    let instance = budget_json(tmp.path(), data.path());

    let schema_path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("schemas/budget-report.v1.json");
    let schema_raw = std::fs::read_to_string(&schema_path).expect("failed to read schema file");
    let schema: serde_json::Value =
        serde_json::from_str(&schema_raw).expect("schema is not valid JSON");

    jsonschema::validate(&schema, &instance)
        .expect("CLI JSON output should validate against the schema");
}

#[test]
fn budget_html_contains_structure() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 1500);

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "show", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<title>Cultural events budget</title>"))
        .stdout(predicate::str::contains("«Гамлет»"))
        .stdout(predicate::str::contains("Total: 1050 ₽"));
}

#[test]
fn budget_text_export() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "show", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("CULTURAL EVENTS BUDGET"))
        .stdout(predicate::str::contains("2. Выставка «Новые имена»"))
        .stdout(predicate::str::contains("Total: 1050 ₽"));
}

#[test]
fn budget_set_persists_and_records_history() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "set", "2000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Planned budget set to 2000 ₽"));

    let storage = open_storage(data.path());
    assert_eq!(storage.planned_budget().unwrap(), 2000);

    let history = storage.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].planned_budget, 2000);
    assert_eq!(history[0].total, 1050);
    assert_eq!(history[0].event_ids, vec![1, 2, 3]);
}

#[test]
fn budget_set_negative_clamps_to_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 500);

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "set", "-100"])
        .assert()
        .success()
        .stderr(predicate::str::contains("cannot be negative"));

    assert_eq!(open_storage(data.path()).planned_budget().unwrap(), 0);
}

#[test]
fn budget_history_lists_calculations() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "set", "1500"])
        .assert()
        .success();

    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Student"))
        .stdout(predicate::str::contains("1050 ₽"));
}

#[test]
fn budget_history_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    afisha_with_db(tmp.path(), data.path())
        .args(["budget", "history"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No calculations recorded yet"));
}

#[test]
fn category_set_changes_prices() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .args(["category", "set", "discount"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Discount"));

    let parsed = budget_json(tmp.path(), data.path());
    assert_eq!(parsed["category"], "discount");
    assert_eq!(parsed["budget"]["total"], 750);
    assert_eq!(parsed["analytics"]["savings"], 750);
}

#[test]
fn category_show_marks_active() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .args(["category"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* student"));
}

#[test]
fn category_set_rejects_unknown() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    afisha_with_db(tmp.path(), data.path())
        .args(["category", "set", "vip"])
        .assert()
        .failure();
}

#[test]
fn watch_renders_once_with_zero_cycles() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    seed_student_selection(data.path(), 0);

    afisha_with_db(tmp.path(), data.path())
        .args(["watch", "--cycles", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1050 ₽"))
        .stdout(predicate::str::contains("--- updated").not());
}
