//! Integration tests for the lab-fixtures binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn get_binary_path() -> String {
    std::env::var("CARGO_BIN_EXE_lab-fixtures")
        .unwrap_or_else(|_| "target/debug/lab-fixtures".to_string())
}

#[test]
fn test_bare_invocation_writes_default_file() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let path = dir.path().join("lab_equipment_2000.csv");
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2001);
    assert!(content.starts_with("title;description;category;tags;location;valuation;custodian;"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Generated 2000 records");
    assert!(lines[1].starts_with("Number of unique locations: "));
    assert!(lines[2].starts_with("Number of unique custodians: "));
}

#[test]
fn test_seeded_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    for name in ["a.csv", "b.csv"] {
        let status = Command::new(get_binary_path())
            .current_dir(dir.path())
            .args(["generate", "-o", name, "-n", "100", "--seed", "42", "--date", "2024-01-15"])
            .status()
            .unwrap();
        assert!(status.success());
    }

    let a = fs::read_to_string(dir.path().join("a.csv")).unwrap();
    let b = fs::read_to_string(dir.path().join("b.csv")).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.lines().count(), 101);
}

#[test]
fn test_zero_count_rejected() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "--count", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 1"));
    assert!(!dir.path().join("lab_equipment_2000.csv").exists());
}

#[test]
fn test_unwritable_output_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "-o", "missing/dir/out.csv", "-n", "5"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_json_summary_and_dry_run() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "--dry-run", "--json", "-n", "25", "--seed", "7"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["seed"], 7);
    assert_eq!(json["summary"]["records"], 25);
    assert!(json.get("output_file").is_none());
    assert!(!dir.path().join("lab_equipment_2000.csv").exists());
}

#[test]
fn test_config_file_and_custom_delimiter() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("fixtures.yaml"),
        "count: 12\nseed: 3\ndate: 2024-01-15\noutput: custom.tsv\ndelimiter: \"\\t\"\n",
    )
    .unwrap();

    let status = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "-c", "fixtures.yaml"])
        .status()
        .unwrap();
    assert!(status.success());

    let content = fs::read_to_string(dir.path().join("custom.tsv")).unwrap();
    assert_eq!(content.lines().count(), 13);
    for line in content.lines() {
        assert_eq!(line.split('\t').count(), 14);
    }
}

#[test]
fn test_validate_command() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "-o", "out.csv", "-n", "50", "--date", "2024-01-15"])
        .status()
        .unwrap();
    assert!(status.success());

    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["validate", "out.csv", "--date", "2024-01-15", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["rows"], 50);
    assert_eq!(json["errors"], 0);

    fs::write(dir.path().join("bad.csv"), "title;description\nx;y\n").unwrap();
    let status = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["validate", "bad.csv"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_quoted_comma_file_round_trips_through_validate() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args([
            "generate", "-n", "20", "--seed", "1", "--date", "2024-01-15", "-d", ",", "--quote",
            "necessary", "-o", "x.csv",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["validate", "x.csv", "-d", ",", "--date", "2024-01-15", "--strict"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_unquoted_comma_delimiter_rejected() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "-n", "5", "-d", ","])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("column header"));
    assert!(!dir.path().join("lab_equipment_2000.csv").exists());
}

#[test]
fn test_date_at_calendar_limit_rejected() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(get_binary_path())
        .current_dir(dir.path())
        .args(["generate", "-n", "5", "--date", "+262142-12-30"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
    assert!(!dir.path().join("lab_equipment_2000.csv").exists());
}

#[test]
fn test_completions() {
    let output = Command::new(get_binary_path())
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("lab-fixtures"));
}
