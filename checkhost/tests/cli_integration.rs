// checkhost/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RESULTS: &str = r#"[
    {"item": "example.org", "status": "UP", "http_code": 200, "source": "WHOIS"},
    {"item": "gone.example", "status": "DOWN"},
    {"item": "not a domain", "status": "INVALID"}
]"#;

/// A workspace with a config directory, an output root and a results file.
fn workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(dir.path().join("results.json"), RESULTS).unwrap();
    dir
}

fn checkhost(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("checkhost").unwrap();
    cmd.env_remove("CH_OUTPUT_ROOT")
        .env_remove("CH_COLOUR")
        .env_remove("CH_ONLY_ON_FILE")
        .env_remove("CH_HOSTS_IP")
        .env_remove("RUST_LOG")
        .env("CH_CONFIG_DIR", dir.join("config"))
        .arg("--output-root")
        .arg(dir);
    cmd
}

#[test]
fn test_help_shows_flags() {
    let mut cmd = Command::cargo_bin("checkhost").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--results"))
        .stdout(predicate::str::contains("--clean-all"))
        .stdout(predicate::str::contains("--progress"))
        .stdout(predicate::str::contains("--only-on-file"));
}

#[test]
fn test_requires_input() {
    let mut cmd = Command::cargo_bin("checkhost").unwrap();

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("You must specify items"));
}

#[test]
fn test_less_report_is_written_and_echoed() {
    let dir = workspace();

    checkhost(dir.path())
        .args(["--mode", "less", "--results"])
        .arg(dir.path().join("results.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Domain"))
        .stdout(predicate::str::contains("example.org"))
        .stdout(predicate::str::contains("Percentage"));

    let report = fs::read_to_string(dir.path().join("output/results.txt")).unwrap();
    assert!(report.starts_with("# Generated by checkhost (v"));
    assert!(report.contains("# Date of generation: "));
    assert!(report.contains("gone.example"));
    assert!(report.contains("DOWN"));
    assert!(!report.contains('\x1b'));

    let percentage = fs::read_to_string(dir.path().join("output/percentage.txt")).unwrap();
    assert!(percentage.contains("UP"));
    assert!(percentage.contains("33%"));
}

#[test]
fn test_only_on_file_keeps_stdout_clean() {
    let dir = workspace();

    checkhost(dir.path())
        .args(["--only-on-file", "--results"])
        .arg(dir.path().join("results.json"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(dir.path().join("output/results.txt").exists());
}

#[test]
fn test_hosts_mode() {
    let dir = workspace();
    let hosts = dir.path().join("hosts.txt");

    checkhost(dir.path())
        .args(["--mode", "hosts", "--only-on-file", "--results"])
        .arg(dir.path().join("results.json"))
        .arg("--output")
        .arg(&hosts)
        .assert()
        .success();

    let content = fs::read_to_string(&hosts).unwrap();
    assert!(content.contains("\n0.0.0.0 example.org\n"));
    assert!(!content.contains("Domain"));
}

#[test]
fn test_fresh_runs_replace_report_outside_output_tree() {
    let dir = workspace();
    let report = dir.path().join("report.txt");

    for _ in 0..2 {
        checkhost(dir.path())
            .args(["--mode", "less", "--only-on-file", "--results"])
            .arg(dir.path().join("results.json"))
            .arg("--output")
            .arg(&report)
            .assert()
            .success();
    }

    let content = fs::read_to_string(&report).unwrap();
    assert_eq!(content.matches("example.org").count(), 1);
    assert_eq!(content.matches("# Generated by").count(), 1);
    assert_eq!(content.lines().filter(|l| l.starts_with("Domain")).count(), 1);
}

#[test]
fn test_resumed_run_appends_to_report() {
    let dir = workspace();
    let report = dir.path().join("report.txt");

    checkhost(dir.path())
        .args(["--mode", "less", "--only-on-file", "--results"])
        .arg(dir.path().join("results.json"))
        .arg("--output")
        .arg(&report)
        .assert()
        .success();

    checkhost(dir.path())
        .args(["--mode", "less", "--only-on-file", "--progress", "1", "--results"])
        .arg(dir.path().join("results.json"))
        .arg("--output")
        .arg(&report)
        .assert()
        .success();

    let content = fs::read_to_string(&report).unwrap();
    assert_eq!(content.matches("example.org").count(), 1);
    assert_eq!(content.matches("gone.example").count(), 2);
    assert_eq!(content.lines().filter(|l| l.starts_with("Domain")).count(), 1);
}

#[test]
fn test_stale_output_is_purged_but_reserved_files_kept() {
    let dir = workspace();
    let output = dir.path().join("output");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join(".gitignore"), "*\n").unwrap();
    fs::write(output.join("stale.txt"), "old\n").unwrap();

    checkhost(dir.path())
        .arg("example.org")
        .assert()
        .success();

    assert!(output.join(".gitignore").exists());
    assert!(!output.join("stale.txt").exists());
}

#[test]
fn test_resumed_run_keeps_output() {
    let dir = workspace();
    let output = dir.path().join("output");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("partial.txt"), "half done\n").unwrap();

    checkhost(dir.path())
        .args(["a.example", "b.example", "c.example", "--progress", "1"])
        .assert()
        .success();

    assert!(output.join("partial.txt").exists());
}

#[test]
fn test_clean_all_removes_databases() {
    let dir = workspace();
    let config = dir.path().join("config");
    fs::write(config.join("inactive_db.json"), "{}").unwrap();
    fs::write(config.join("whois_db.json"), "{}").unwrap();

    checkhost(dir.path())
        .args(["example.org", "--clean-all"])
        .assert()
        .success();

    assert!(!config.join("inactive_db.json").exists());
    assert!(!config.join("whois_db.json").exists());
}

#[test]
fn test_invalid_results_file() {
    let dir = workspace();
    fs::write(dir.path().join("broken.json"), "not json").unwrap();

    checkhost(dir.path())
        .arg("--results")
        .arg(dir.path().join("broken.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
