use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TRANSACTIONS: &str = r#"[
    {"date": "2024-05-15", "amount": 50000, "income": true, "category_id": 1, "name": "Salary"},
    {"date": "2024-05-16", "amount": 1250, "income": false, "category_id": 2, "name": "Lunch"},
    {"date": "2024-06-03", "amount": 8000, "income": false, "category_id": 2},
    {"date": "2023-11-20", "amount": 700, "income": true}
]"#;

const CATEGORIES: &str = r#"[{"id": 1, "name": "Salary"}, {"id": 2, "name": "Food"}]"#;

fn tally(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env_remove("RUST_LOG").arg("--data-dir").arg(dir);
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    tally(dir.path()).arg("init").assert().success();
    fs::write(dir.path().join("data").join("transactions.json"), TRANSACTIONS).unwrap();
    fs::write(dir.path().join("data").join("categories.json"), CATEGORIES).unwrap();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();
    tally(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("transactions.json").exists());
    assert!(dir.path().join("data").join("categories.json").exists());
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();
    tally(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("Axis levels:     5"));
}

#[test]
fn day_chart_for_past_month() {
    let dir = initialized();
    tally(dir.path())
        .args(["chart", "time", "--month", "2024-05", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("May 2024 by day"))
        .stdout(predicate::str::contains("Wednesday 15.05."))
        .stdout(predicate::str::contains("$500.00 (1)"))
        .stdout(predicate::str::contains("Axis: 100 | 200 | 300 | 400 | 500"))
        .stdout(predicate::str::contains("Page 2 of 3"));
}

#[test]
fn week_chart_spans_whole_weeks() {
    let dir = initialized();
    tally(dir.path())
        .args(["chart", "time", "-g", "week", "--month", "2024-06", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"period_start\": \"2024-05-27\""))
        .stdout(predicate::str::contains("\"period_end\": \"2024-06-30\""))
        .stdout(predicate::str::contains("\"total_pages\": 1"));
}

#[test]
fn year_chart_range() {
    let dir = initialized();
    tally(dir.path())
        .args(["chart", "time", "-g", "year", "--year", "2023", "--to-year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-2024 by year"))
        .stdout(predicate::str::contains("$7.00 (1)"));
}

#[test]
fn category_chart() {
    let dir = initialized();
    tally(dir.path())
        .args([
            "chart",
            "categories",
            "--start",
            "2024-05-01",
            "--end",
            "2024-06-30",
            "--hide-income",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("$92.50 (2)"))
        .stdout(predicate::str::contains("Total: income hidden"));
}

#[test]
fn inverted_range_is_rejected() {
    let dir = initialized();
    tally(dir.path())
        .args([
            "chart",
            "categories",
            "--start",
            "2024-06-30",
            "--end",
            "2024-05-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn csv_snapshot() {
    let dir = initialized();
    let csv_path = dir.path().join("export.csv");
    fs::write(
        &csv_path,
        "date,type,amount,category\n2024-05-02,expense,\"12,50\",2\n2024-05-02,income,30,1\n",
    )
    .unwrap();

    tally(dir.path())
        .arg("--transactions")
        .arg(&csv_path)
        .args(["chart", "time", "--month", "2024-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Thursday 02.05."))
        .stdout(predicate::str::contains("$12.50 (1)"))
        .stdout(predicate::str::contains("$30.00 (1)"));
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = TempDir::new().unwrap();
    tally(dir.path())
        .args(["chart", "time"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot not found"));
}

#[test]
fn other_user_sees_nothing() {
    let dir = initialized();
    tally(dir.path())
        .args(["--user", "9", "chart", "time", "--month", "2024-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Axis: 1 | 2 | 3 | 4 | 5"));
}
