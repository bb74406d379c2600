// checkhost-lib/tests/integration.rs

//! Integration tests for checkhost-lib: a reset followed by a rendered run.

use checkhost_lib::{
    CheckhostError, HeaderSpec, RenderMode, ReportRenderer, ResetDecision, RunConfig,
    RunProgress, Status, TestResult, WorkspaceResetCoordinator,
};
use std::fs;
use tempfile::TempDir;

fn results() -> Vec<TestResult> {
    vec![
        TestResult {
            expiration_date: Some("02-jan-2030".to_string()),
            source: Some("WHOIS".to_string()),
            http_code: Some(200),
            ..TestResult::new("example.org", Status::Up)
        },
        TestResult::new("gone.example", Status::Down),
        TestResult::new("not a domain", Status::Invalid),
    ]
}

#[test]
fn test_reset_then_render_generic_report() {
    let root = TempDir::new().unwrap();
    let config = RunConfig::default().with_output_root(root.path());
    let output = config.output_directory();
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join(".keep"), "").unwrap();
    fs::write(output.join("results.txt"), "stale\n").unwrap();

    let items: Vec<String> = results().iter().map(|r| r.item.clone()).collect();
    let progress = RunProgress::new(items.len());

    let mut coordinator = WorkspaceResetCoordinator::new(root.path(), config.clone());
    let outcome = coordinator.run(&items, &progress, false).unwrap();

    assert_eq!(outcome.decision, ResetDecision::PurgeAfterReset);
    assert_eq!(progress.get(), 0);
    assert!(output.join(".keep").exists());
    assert!(!output.join("results.txt").exists());

    let report = output.join("results.txt");
    let header = HeaderSpec::new([("Domain", 12), ("Status", 7), ("HTTP Code", 4)]).unwrap();

    for result in results() {
        ReportRenderer::new(
            Some(result.less_row()),
            RenderMode::ColorizedTabular,
            Some(&report),
            true,
        )
        .with_header(header.clone())
        .data()
        .unwrap();
        progress.increment();
    }

    assert_eq!(progress.get(), 3);

    let content = fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert!(lines[0].starts_with("# Generated by checkhost (v"));
    assert!(lines[1].starts_with("# Date of generation: "));
    assert_eq!(lines[2], "Domain       Status  HTTP Code ");
    assert_eq!(lines[3], "------------ ------- --------- ");
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "example.org  UP      200       ");
    assert_eq!(lines[6], "gone.example DOWN    ***       ");
    assert_eq!(lines[7], "not a domain INVALID ***       ");
    assert!(!content.contains('\x1b'));
}

#[test]
fn test_hosts_report() {
    let root = TempDir::new().unwrap();
    let hosts = root.path().join("hosts");

    for result in results().iter().filter(|r| r.status == Status::Up) {
        ReportRenderer::new(
            Some(result.hosts_row("0.0.0.0")),
            RenderMode::HostsList,
            Some(&hosts),
            true,
        )
        .data()
        .unwrap();
    }

    let content = fs::read_to_string(&hosts).unwrap();
    assert!(content.ends_with("\n\n0.0.0.0 example.org\n"));
}

#[test]
fn test_generic_row_against_generic_header() {
    let line = ReportRenderer::new(
        Some(results()[0].generic_row()),
        RenderMode::PlainTabular,
        None::<&str>,
        true,
    )
    .with_header(HeaderSpec::generic())
    .data()
    .unwrap();

    let expected_len: usize = HeaderSpec::generic()
        .iter()
        .map(|(name, width)| width.max(name.len()) + 1)
        .sum();
    assert_eq!(line.len(), expected_len);
    assert!(line.starts_with("example.org "));
}

#[test]
fn test_mismatched_row_is_rejected() {
    let err = ReportRenderer::new(
        Some(results()[0].less_row()),
        RenderMode::PlainTabular,
        None::<&str>,
        true,
    )
    .with_header(HeaderSpec::generic())
    .data()
    .unwrap_err();

    assert_eq!(err, CheckhostError::size_mismatch(3, 6));
}
