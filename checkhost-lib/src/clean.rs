//! Output workspace reset.
//!
//! Before a run starts, the [`WorkspaceResetCoordinator`] looks at the items
//! scheduled for testing and the shared [`RunProgress`] to tell a fresh or
//! completed run (purge the previous output) from an interrupted one (keep it
//! and resume).
//!
//! The heuristic compares the last tested item with the last scheduled item,
//! so the item list must keep the same order across a resumed run.

use crate::config::{ConfigManager, RunConfig};
use crate::error::CheckhostError;
use crate::progress::RunProgress;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Files inside the output tree that are never deleted.
pub const RESERVED_FILES: [&str; 2] = [".gitignore", ".keep"];

/// What the coordinator decided to do with the previous run's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDecision {
    /// Resume: keep output and counter
    NoPurge,

    /// Purge output, leave the counter untouched
    Purge,

    /// Reset the counter to zero, then purge output
    PurgeAfterReset,
}

impl ResetDecision {
    pub fn purges(&self) -> bool {
        !matches!(self, ResetDecision::NoPurge)
    }
}

/// Outcome of a purge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    /// Files that were removed
    pub deleted: Vec<PathBuf>,

    /// Files that were already gone
    pub missing: Vec<PathBuf>,

    /// Files that could not be removed, with the reason
    pub failed: Vec<(PathBuf, String)>,

    /// Whether configuration was reloaded after a full clean
    pub config_reloaded: bool,
}

/// Outcome of [`WorkspaceResetCoordinator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResetOutcome {
    pub decision: ResetDecision,

    /// Present whenever a purge happened
    pub report: Option<CleanReport>,
}

/// Decides whether previous output must be purged and performs the purge.
#[derive(Debug, Clone)]
pub struct WorkspaceResetCoordinator {
    config_dir: PathBuf,
    config: RunConfig,
    manager: ConfigManager,
}

impl WorkspaceResetCoordinator {
    /// Create a coordinator.
    ///
    /// # Arguments
    ///
    /// * `config_dir` - Directory holding the persisted databases and `checkhost.toml`
    /// * `config` - Resolved settings, including the output tree location
    pub fn new<P: Into<PathBuf>>(config_dir: P, config: RunConfig) -> Self {
        Self {
            config_dir: config_dir.into(),
            config,
            manager: ConfigManager::default(),
        }
    }

    /// Use `manager` when reloading configuration after a full clean.
    pub fn with_manager(mut self, manager: ConfigManager) -> Self {
        self.manager = manager;
        self
    }

    /// Current settings.
    ///
    /// A full clean rebuilds them from the defaults and the configuration
    /// directory's file, so callers re-apply their own overrides afterwards.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Decide from `items` and `progress`, then purge if needed.
    ///
    /// The counter is reset to zero before any purge except the one triggered
    /// by an empty item list.
    pub fn run<T: PartialEq>(
        &mut self,
        items: &[T],
        progress: &RunProgress,
        clean_all: bool,
    ) -> Result<ResetOutcome, CheckhostError> {
        let tested = progress.get();
        let decision = decide(items, tested);

        debug!(
            items = items.len(),
            tested,
            ?decision,
            "workspace reset decision"
        );

        let report = match decision {
            ResetDecision::NoPurge => None,
            ResetDecision::Purge => Some(self.almost_everything(clean_all)?),
            ResetDecision::PurgeAfterReset => {
                progress.reset();
                Some(self.almost_everything(clean_all)?)
            }
        };

        Ok(ResetOutcome { decision, report })
    }

    /// Every regular file in the output tree except the reserved ones.
    ///
    /// A missing output tree has nothing to delete. Unreadable entries below
    /// the root are skipped with a warning.
    pub fn file_to_delete(&self) -> Result<Vec<PathBuf>, CheckhostError> {
        let directory = self.config.output_directory();

        if !directory.exists() {
            return Ok(Vec::new());
        }

        let mut result = Vec::new();

        for entry in WalkDir::new(&directory).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry in output tree: {}", e);
                    continue;
                }
            };

            // Symlinks are removed as links, never followed.
            if entry.file_type().is_dir() {
                continue;
            }

            let reserved = entry
                .file_name()
                .to_str()
                .map(|name| RESERVED_FILES.contains(&name))
                .unwrap_or(false);

            if !reserved {
                result.push(entry.into_path());
            }
        }

        Ok(result)
    }

    /// Persisted database and cache files under the configuration directory.
    pub fn databases_to_delete(&self) -> Vec<PathBuf> {
        self.config
            .database_files
            .names()
            .iter()
            .map(|name| self.config_dir.join(name))
            .collect()
    }

    /// Delete the output files, plus the databases when `clean_all` is set.
    ///
    /// Deletion is best-effort per file: missing files are skipped and
    /// failures are logged and reported. A full clean then reloads
    /// configuration from the configuration directory.
    pub fn almost_everything(&mut self, clean_all: bool) -> Result<CleanReport, CheckhostError> {
        let mut to_delete = self.file_to_delete()?;

        if clean_all {
            to_delete.extend(self.databases_to_delete());
        }

        let mut report = CleanReport::default();

        for path in to_delete {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "deleted");
                    report.deleted.push(path);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => report.missing.push(path),
                Err(e) => {
                    warn!("Could not delete {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        if clean_all {
            let file_config = self.manager.load_dir(&self.config_dir)?;
            self.config = RunConfig::default().apply_file(&file_config);
            report.config_reloaded = true;
        }

        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            clean_all,
            "cleaned output workspace"
        );

        Ok(report)
    }
}

/// The reset heuristic.
///
/// With `n` items tested out of `items`, purge when the list is empty, when
/// nothing was tested, when the n-th item equals the last item, or when the
/// counter reached the end of the list. A counter beyond the list is treated
/// as stale and also purges.
fn decide<T: PartialEq>(items: &[T], tested: usize) -> ResetDecision {
    if items.is_empty() {
        return ResetDecision::Purge;
    }

    if tested == 0 {
        return ResetDecision::PurgeAfterReset;
    }

    match items.get(tested - 1) {
        Some(last_tested) if Some(last_tested) == items.last() => ResetDecision::PurgeAfterReset,
        Some(_) if tested >= items.len() => ResetDecision::PurgeAfterReset,
        Some(_) => ResetDecision::NoPurge,
        None => {
            debug!(tested, items = items.len(), "progress counter beyond item list");
            ResetDecision::PurgeAfterReset
        }
    }
}
