//! # Checkhost Library
//!
//! Reporting and workspace housekeeping for domain, IP and URL availability runs.
//!
//! The availability probing itself lives elsewhere. This library takes its
//! per-item results and turns them into column-aligned reports (or hosts
//! files), and decides before a run whether the previous run's output must be
//! purged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use checkhost_lib::{
//!     HeaderSpec, RenderMode, ReportRenderer, RunConfig, RunProgress, Status, TestResult,
//!     WorkspaceResetCoordinator,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let items = vec!["example.org".to_string()];
//!     let progress = RunProgress::default();
//!
//!     let mut coordinator = WorkspaceResetCoordinator::new("config", RunConfig::default());
//!     coordinator.run(&items, &progress, false)?;
//!
//!     let result = TestResult::new("example.org", Status::Up);
//!     ReportRenderer::new(
//!         Some(result.generic_row()),
//!         RenderMode::ColorizedTabular,
//!         Some("output/results.txt"),
//!         false,
//!     )
//!     .with_header(HeaderSpec::generic())
//!     .data()?;
//!     progress.increment();
//!     Ok(())
//! }
//! ```

// Re-export main public API types and functions
pub use clean::{
    CleanReport, ResetDecision, ResetOutcome, WorkspaceResetCoordinator, RESERVED_FILES,
};
pub use config::{
    default_config_dir, load_env_config, ConfigManager, DatabaseFiles, DefaultFilesConfig,
    DisplayConfig, EnvConfig, FileConfig, OutputsConfig, RunConfig, CONFIG_FILE_NAME,
};
pub use error::CheckhostError;
pub use header::HeaderSpec;
pub use progress::RunProgress;
pub use render::{status_style, ReportRenderer, DEFAULT_SEPARATOR};
pub use types::{RenderMode, Status, TestResult, NO_HTTP_CODE, UNKNOWN_FIELD};

// Internal modules - their public items are re-exported above
mod clean;
mod config;
mod error;
mod header;
mod progress;
mod render;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CheckhostError>;

// Library name, version and repository, as written in report preambles
pub const NAME: &str = "checkhost";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const REPO_LINK: &str = env!("CARGO_PKG_REPOSITORY");
