//! 記録ツールの結合テスト

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TRACKER_BIN: &str = env!("CARGO_BIN_EXE_arbeitszeit");

fn setup() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[general]
data_path = "data"
show_days_after_log = 3

[holidays]
country = "DE"
subdivision = "BY"

[display]
nan_replacement = "-"
"#,
    )
    .unwrap();
    (temp_dir, config_path)
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(TRACKER_BIN)
        .args(args)
        .arg("--config")
        .arg(config)
        .output()
        .unwrap()
}

fn schedule(temp_dir: &TempDir, month: &str) -> String {
    fs::read_to_string(
        temp_dir
            .path()
            .join("data")
            .join(format!("schedule_{}.csv", month)),
    )
    .unwrap()
}

#[test]
fn test_create_then_log_day() {
    let (temp_dir, config) = setup();

    let output = run(&config, &["create", "--date", "2024-01-01"]);
    assert!(output.status.success());
    assert!(schedule(&temp_dir, "2024-01").contains("2024-01-06,True,,,,,,Heilige Drei Könige"));

    assert!(run(&config, &["start", "08:00", "--date", "2024-01-08"]).status.success());
    assert!(run(&config, &["end", "16:30", "--date", "2024-01-08"]).status.success());
    let output = run(&config, &["break", "30", "--date", "2024-01-08"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2024-01-08"));
    assert!(stdout.contains("00:30"));

    assert!(schedule(&temp_dir, "2024-01").contains("2024-01-08,False,08:00,16:30,00:30,,,"));
}

#[test]
fn test_create_twice_fails() {
    let (_temp_dir, config) = setup();

    assert!(run(&config, &["create", "--date", "2024-02-01"]).status.success());
    let output = run(&config, &["create", "--date", "2024-02-01"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn test_vacation_creates_month_on_demand() {
    let (temp_dir, config) = setup();

    let output = run(&config, &["vacation", "1.0", "--date", "2024-03-12"]);
    assert!(output.status.success());
    assert!(schedule(&temp_dir, "2024-03").contains("2024-03-12,False,,,,1.0,,"));
}

#[test]
fn test_show_window() {
    let (_temp_dir, config) = setup();
    run(&config, &["create", "--date", "2024-04-01"]);

    let output = run(&config, &["show", "2", "--date", "2024-04-10"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("2024-04-09"));
    assert!(lines[2].contains("2024-04-10"));
}

#[test]
fn test_show_missing_month_fails() {
    let (_temp_dir, config) = setup();

    let output = run(&config, &["show", "--date", "2099-01-01"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_no_command_prints_help() {
    let output = Command::new(TRACKER_BIN).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_invalid_day_fraction_rejected() {
    let (_temp_dir, config) = setup();

    let output = run(&config, &["sick", "0.75", "--date", "2024-01-02"]);
    assert!(!output.status.success());
}
