//! Terminal output for the checkhost CLI: reset notes and the closing
//! percentage table.

use checkhost_lib::{
    CheckhostError, HeaderSpec, RenderMode, ReportRenderer, ResetDecision, ResetOutcome, Status,
    TestResult,
};
use console::style;
use std::path::Path;

// ── Reset ────────────────────────────────────────────────────────────────────

/// Describe what the workspace reset did. Written to stderr so stdout only
/// carries reports.
pub fn print_reset_outcome(outcome: &ResetOutcome, verbose: bool) {
    let Some(report) = &outcome.report else {
        if verbose {
            eprintln!("{}", style(describe_decision(outcome.decision)).dim());
        }
        return;
    };

    if verbose {
        eprintln!(
            "{} {}",
            style(describe_decision(outcome.decision)).dim(),
            style(format!(
                "({} deleted, {} already gone{})",
                report.deleted.len(),
                report.missing.len(),
                if report.config_reloaded {
                    ", configuration reloaded"
                } else {
                    ""
                }
            ))
            .dim()
        );
    }

    for (path, reason) in &report.failed {
        eprintln!(
            "{} could not delete {}: {}",
            style("warning:").yellow().bold(),
            path.display(),
            reason
        );
    }
}

fn describe_decision(decision: ResetDecision) -> &'static str {
    match decision {
        ResetDecision::NoPurge => "Resuming previous run, output kept",
        ResetDecision::Purge => "Output directory purged",
        ResetDecision::PurgeAfterReset => "Previous run finished, counter reset and output purged",
    }
}

// ── Percentage ───────────────────────────────────────────────────────────────

/// One `[status, percentage, count]` row per status, in `Status::ALL` order.
pub fn percentage_rows(results: &[TestResult]) -> Vec<Vec<String>> {
    let total = results.len();

    Status::ALL
        .iter()
        .map(|status| {
            let count = results.iter().filter(|r| r.status == *status).count();
            let percentage = if total == 0 {
                0
            } else {
                (count * 100 + total / 2) / total
            };
            vec![
                status.to_string(),
                format!("{}%", percentage),
                count.to_string(),
            ]
        })
        .collect()
}

/// Render the percentage table into `file`, echoing it unless `only_on_file`.
/// The table is regenerated on every run.
pub fn print_percentage(
    results: &[TestResult],
    file: &Path,
    only_on_file: bool,
) -> Result<(), CheckhostError> {
    crate::remove_stale_file(file)?;

    let header = HeaderSpec::percentage();

    if !only_on_file {
        println!();
    }

    ReportRenderer::new(None, RenderMode::PlainTabular, Some(file), only_on_file)
        .header(&header)?;

    for row in percentage_rows(results) {
        ReportRenderer::new(Some(row), RenderMode::PlainTabular, Some(file), only_on_file)
            .with_header(header.clone())
            .data()?;
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
