//! Checkhost CLI Application
//!
//! Drives checkhost-lib the way a test loop would: reset the output workspace,
//! then render one report row per tested item, then summarise the run.

mod ui;

use checkhost_lib::{
    default_config_dir, load_env_config, CheckhostError, ConfigManager, FileConfig, HeaderSpec,
    RenderMode, ReportRenderer, ResetDecision, RunConfig, RunProgress, TestResult,
    WorkspaceResetCoordinator,
};
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Layout of the generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Every column: domain, status, expiration, source, HTTP code, date
    Generic,
    /// Domain, status and HTTP code
    Less,
    /// Domain, status, HTTP code and date
    Http,
    /// `<ip> <domain>` lines for a hosts file
    Hosts,
}

impl ReportKind {
    fn header(&self) -> HeaderSpec {
        match self {
            ReportKind::Generic => HeaderSpec::generic(),
            ReportKind::Less => HeaderSpec::less(),
            ReportKind::Http => HeaderSpec::http(),
            ReportKind::Hosts => HeaderSpec::hosts(),
        }
    }

    fn mode(&self) -> RenderMode {
        match self {
            ReportKind::Hosts => RenderMode::HostsList,
            _ => RenderMode::ColorizedTabular,
        }
    }

    fn row(&self, result: &TestResult, hosts_ip: &str) -> Vec<String> {
        match self {
            ReportKind::Generic => result.generic_row(),
            ReportKind::Less => result.less_row(),
            ReportKind::Http => result.http_row(),
            ReportKind::Hosts => result.hosts_row(hosts_ip),
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            ReportKind::Hosts => "hosts",
            _ => "results.txt",
        }
    }
}

/// CLI arguments for checkhost
#[derive(Parser, Debug)]
#[command(name = "checkhost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render availability results into aligned reports and hosts files")]
#[command(
    long_about = "Render availability results into aligned reports and hosts files.\n\nBefore rendering, the output directory of a previous run is purged unless the run is being resumed."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Items scheduled for testing (domains, IPs or URLs)
    #[arg(value_name = "ITEMS", help_heading = "Input")]
    pub items: Vec<String>,

    /// File with scheduled items (one per line)
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Input")]
    pub file: Option<String>,

    /// JSON file with the test results to render
    #[arg(short = 'r', long = "results", value_name = "FILE", help_heading = "Input")]
    pub results: Option<String>,

    /// Number of items already tested by a previous, interrupted run
    #[arg(long = "progress", value_name = "N", default_value = "0", help_heading = "Input")]
    pub progress: usize,

    /// Report layout
    #[arg(short = 'm', long = "mode", value_enum, default_value = "generic", help_heading = "Output")]
    pub mode: ReportKind,

    /// Report file (defaults to a file in the output directory)
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output")]
    pub output: Option<String>,

    /// Root of the output directory tree
    #[arg(long = "output-root", value_name = "DIR", help_heading = "Output")]
    pub output_root: Option<String>,

    /// Write reports without echoing them to stdout
    #[arg(long = "only-on-file", help_heading = "Output")]
    pub only_on_file: bool,

    /// Disable status colours
    #[arg(long = "no-colour", help_heading = "Output")]
    pub no_colour: bool,

    /// Also delete persisted databases and reload configuration
    #[arg(long = "clean-all", help_heading = "Cleanup")]
    pub clean_all: bool,

    /// Configuration directory (databases and checkhost.toml)
    #[arg(long = "config-dir", value_name = "DIR", help_heading = "Configuration")]
    pub config_dir: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.items.is_empty() && args.file.is_none() && args.results.is_none() {
        return Err(
            "You must specify items, a file with --file, or results with --results".to_string(),
        );
    }

    if args.only_on_file && args.results.is_none() {
        return Err("--only-on-file needs results to write (--results)".to_string());
    }

    Ok(())
}

/// Main run: reset, render, summarise.
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (config_dir, config) = build_config(&args)?;

    let results = match &args.results {
        Some(path) => read_results(path)?,
        None => Vec::new(),
    };

    let items = scheduled_items(&args, &results)?;
    debug!(items = items.len(), results = results.len(), "scheduled run");

    let progress = RunProgress::new(args.progress);
    let mut coordinator = WorkspaceResetCoordinator::new(&config_dir, config)
        .with_manager(ConfigManager::new(args.verbose));

    let outcome = coordinator.run(&items, &progress, args.clean_all)?;
    ui::print_reset_outcome(&outcome, args.verbose);

    // A full clean rebuilt configuration from disk; env and CLI still win.
    let mut config = coordinator.config().clone();
    if outcome.report.as_ref().is_some_and(|r| r.config_reloaded) {
        config = config.apply_env(&load_env_config());
    }
    let config = apply_cli_overrides(config, &args);

    if results.is_empty() {
        return Ok(());
    }

    let report = match &args.output {
        Some(path) => PathBuf::from(path),
        None => config.output_directory().join(args.mode.default_file_name()),
    };
    ensure_parent(&report)?;

    // The report may live outside the purged output tree.
    if outcome.decision.purges() {
        remove_stale_file(&report)?;
    }

    let colour = config.colour && console::colors_enabled();
    let resumed = outcome.decision == ResetDecision::NoPurge && progress.get() > 0;
    let header = args.mode.header();
    let mode = args.mode.mode();

    if mode.is_tabular() && !(resumed && report.exists()) {
        ReportRenderer::new(None, mode, Some(&report), config.only_on_file)
            .with_colour(colour)
            .header(&header)?;
    }

    for result in results.iter().skip(progress.get()) {
        let mut renderer = ReportRenderer::new(
            Some(args.mode.row(result, &config.hosts_ip)),
            mode,
            Some(&report),
            config.only_on_file,
        )
        .with_colour(colour);

        if mode.is_tabular() {
            renderer = renderer.with_header(header.clone());
        }

        let rendered = renderer.data();

        match rendered {
            Ok(_) => {}
            Err(e) if e.is_render_error() => warn!("Skipping row for {}: {}", result.item, e),
            Err(e) => return Err(e.into()),
        }

        progress.increment();
    }

    let percentage_file = config.output_directory().join("percentage.txt");
    ensure_parent(&percentage_file)?;
    ui::print_percentage(&results, &percentage_file, config.only_on_file)?;

    Ok(())
}

/// Resolve the configuration directory and settings.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (CH_*)
/// 3. Explicit config file (--config) or the config directory's checkhost.toml
/// 4. Discovered config files (local, home, XDG)
/// 5. Built-in defaults
fn build_config(args: &Args) -> Result<(PathBuf, RunConfig), CheckhostError> {
    let env_config = load_env_config();
    let manager = ConfigManager::new(args.verbose);

    let explicit_dir = args
        .config_dir
        .clone()
        .or_else(|| env_config.config_dir.clone())
        .map(PathBuf::from);

    let file_config: FileConfig = if let Some(path) = &args.config {
        debug!("Using explicit config file (CLI --config): {}", path);
        manager.load_file(path)?
    } else if let Some(dir) = &explicit_dir {
        manager.load_dir(dir)?
    } else {
        manager.discover_and_load()?
    };

    let config_dir = explicit_dir
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = RunConfig::default()
        .apply_file(&file_config)
        .apply_env(&env_config);

    Ok((config_dir, apply_cli_overrides(config, args)))
}

fn apply_cli_overrides(mut config: RunConfig, args: &Args) -> RunConfig {
    if let Some(root) = &args.output_root {
        config = config.with_output_root(root);
    }
    if args.only_on_file {
        config = config.with_only_on_file(true);
    }
    if args.no_colour {
        config = config.with_colour(false);
    }
    config
}

/// Items from the command line, then the items file; the results' items when
/// neither is given.
fn scheduled_items(args: &Args, results: &[TestResult]) -> Result<Vec<String>, CheckhostError> {
    let mut items = args.items.clone();

    if let Some(path) = &args.file {
        items.extend(read_items_from_file(path)?);
    }

    if items.is_empty() {
        items = results.iter().map(|r| r.item.clone()).collect();
    }

    Ok(items)
}

/// Read scheduled items from a file, skipping blank lines and comments.
fn read_items_from_file(file_path: &str) -> Result<Vec<String>, CheckhostError> {
    let content = fs::read_to_string(file_path)
        .map_err(|e| CheckhostError::file_error(file_path, format!("Failed to read items: {}", e)))?;

    Ok(content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

/// Read the JSON array of results produced by the test loop.
fn read_results(file_path: &str) -> Result<Vec<TestResult>, CheckhostError> {
    let content = fs::read_to_string(file_path).map_err(|e| {
        CheckhostError::file_error(file_path, format!("Failed to read results: {}", e))
    })?;

    Ok(serde_json::from_str(&content)?)
}

/// Delete `path` if present so the next render starts a new file.
pub(crate) fn remove_stale_file(path: &Path) -> Result<(), CheckhostError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed previous report");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CheckhostError::file_error(
            path.to_string_lossy(),
            format!("Failed to replace previous report: {}", e),
        )),
    }
}

fn ensure_parent(path: &Path) -> Result<(), CheckhostError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).map_err(|e| {
            CheckhostError::file_error(
                parent.to_string_lossy(),
                format!("Failed to create directory: {}", e),
            )
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkhost_lib::Status;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_args() -> Args {
        Args {
            items: vec![],
            file: None,
            results: None,
            progress: 0,
            mode: ReportKind::Generic,
            output: None,
            output_root: None,
            only_on_file: false,
            no_colour: false,
            clean_all: false,
            config_dir: None,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_args_requires_input() {
        let args = create_test_args();
        let result = validate_args(&args);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("You must specify items"));
    }

    #[test]
    fn test_validate_args_with_items() {
        let mut args = create_test_args();
        args.items = vec!["example.org".to_string()];
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_read_items_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# scheduled\nexample.org\n\n  example.net # inline\n#\n").unwrap();

        let items = read_items_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(items, vec!["example.org", "example.net"]);
    }

    #[test]
    fn test_scheduled_items_fall_back_to_results() {
        let args = create_test_args();
        let results = vec![TestResult::new("a.example", Status::Up)];
        assert_eq!(scheduled_items(&args, &results).unwrap(), vec!["a.example"]);

        let mut args = create_test_args();
        args.items = vec!["b.example".to_string()];
        assert_eq!(scheduled_items(&args, &results).unwrap(), vec!["b.example"]);
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut args = create_test_args();
        args.output_root = Some("/tmp/elsewhere".to_string());
        args.no_colour = true;

        let config = apply_cli_overrides(RunConfig::default(), &args);
        assert_eq!(config.output_root, PathBuf::from("/tmp/elsewhere"));
        assert!(!config.colour);
        assert!(!config.only_on_file);
    }

    #[test]
    fn test_remove_stale_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = dir.path().join("report.txt");
        fs::write(&report, "previous run\n").unwrap();

        remove_stale_file(&report).unwrap();
        assert!(!report.exists());

        // Already gone is fine
        remove_stale_file(&report).unwrap();
    }

    #[test]
    fn test_report_kind_rows_match_headers() {
        let result = TestResult::new("example.org", Status::Down);
        for kind in [
            ReportKind::Generic,
            ReportKind::Less,
            ReportKind::Http,
            ReportKind::Hosts,
        ] {
            assert_eq!(kind.row(&result, "0.0.0.0").len(), kind.header().len());
        }
    }
}
