//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, merging
//! configurations with proper precedence rules, and resolving the settings
//! the renderer and the reset coordinator run with.

use crate::error::CheckhostError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the configuration file inside a configuration directory.
pub const CONFIG_FILE_NAME: &str = "checkhost.toml";

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Output tree and persisted database locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<OutputsConfig>,

    /// Report display preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,
}

/// Where generated files live.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputsConfig {
    /// Root under which the output tree is created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Output tree directory name, relative to `root`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_directory: Option<String>,

    /// Persisted state file names, relative to the configuration directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_files: Option<DefaultFilesConfig>,
}

/// File names of the persisted databases and caches.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultFilesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir_structure: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iana: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_suffix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_db: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mining: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_db: Option<String>,
}

/// Report display preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    /// Style stdout rows by status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<bool>,

    /// Write reports without echoing them to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_on_file: Option<bool>,

    /// IP written in front of each hosts-file entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts_ip: Option<String>,
}

/// Resolved persisted database file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFiles {
    pub dir_structure: String,
    pub iana: String,
    pub public_suffix: String,
    pub inactive_db: String,
    pub mining: String,
    pub whois_db: String,
}

impl Default for DatabaseFiles {
    fn default() -> Self {
        Self {
            dir_structure: "dir_structure.json".to_string(),
            iana: "iana-domains-db.json".to_string(),
            public_suffix: "public-suffix.json".to_string(),
            inactive_db: "inactive_db.json".to_string(),
            mining: "mining.json".to_string(),
            whois_db: "whois_db.json".to_string(),
        }
    }
}

impl DatabaseFiles {
    /// File names in a fixed order.
    pub fn names(&self) -> [&str; 6] {
        [
            &self.dir_structure,
            &self.iana,
            &self.public_suffix,
            &self.inactive_db,
            &self.mining,
            &self.whois_db,
        ]
    }
}

/// Settings the renderer and the reset coordinator run with.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Root under which the output tree lives
    pub output_root: PathBuf,

    /// Output tree directory name under `output_root`
    pub parent_directory: String,

    /// Persisted database file names
    pub database_files: DatabaseFiles,

    /// Style stdout rows by status
    pub colour: bool,

    /// Suppress the stdout echo of reports
    pub only_on_file: bool,

    /// IP used for hosts-file entries
    pub hosts_ip: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            parent_directory: "output".to_string(),
            database_files: DatabaseFiles::default(),
            colour: true,
            only_on_file: false,
            hosts_ip: "0.0.0.0".to_string(),
        }
    }
}

impl RunConfig {
    /// The output tree: `<output_root>/<parent_directory>`.
    pub fn output_directory(&self) -> PathBuf {
        self.output_root.join(&self.parent_directory)
    }

    /// Apply every value set in `file` on top of this configuration.
    pub fn apply_file(mut self, file: &FileConfig) -> Self {
        if let Some(outputs) = &file.outputs {
            if let Some(root) = &outputs.root {
                self.output_root = PathBuf::from(root);
            }
            if let Some(parent) = &outputs.parent_directory {
                self.parent_directory = parent.clone();
            }
            if let Some(files) = &outputs.default_files {
                let db = &mut self.database_files;
                let pairs = [
                    (&mut db.dir_structure, &files.dir_structure),
                    (&mut db.iana, &files.iana),
                    (&mut db.public_suffix, &files.public_suffix),
                    (&mut db.inactive_db, &files.inactive_db),
                    (&mut db.mining, &files.mining),
                    (&mut db.whois_db, &files.whois_db),
                ];
                for (slot, value) in pairs {
                    if let Some(value) = value {
                        *slot = value.clone();
                    }
                }
            }
        }

        if let Some(display) = &file.display {
            if let Some(colour) = display.colour {
                self.colour = colour;
            }
            if let Some(only_on_file) = display.only_on_file {
                self.only_on_file = only_on_file;
            }
            if let Some(ip) = &display.hosts_ip {
                self.hosts_ip = ip.clone();
            }
        }

        self
    }

    /// Apply environment overrides on top of this configuration.
    pub fn apply_env(mut self, env_config: &EnvConfig) -> Self {
        if let Some(root) = &env_config.output_root {
            self.output_root = PathBuf::from(root);
        }
        if let Some(colour) = env_config.colour {
            self.colour = colour;
        }
        if let Some(only_on_file) = env_config.only_on_file {
            self.only_on_file = only_on_file;
        }
        if let Some(ip) = &env_config.hosts_ip {
            self.hosts_ip = ip.clone();
        }
        self
    }

    pub fn with_output_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_colour(mut self, colour: bool) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_only_on_file(mut self, only_on_file: bool) -> Self {
        self.only_on_file = only_on_file;
        self
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if parsing fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, CheckhostError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CheckhostError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CheckhostError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            CheckhostError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load `checkhost.toml` from a configuration directory.
    ///
    /// A directory without a configuration file yields the defaults.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<FileConfig, CheckhostError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.exists() {
            self.load_file(path)
        } else {
            debug!(dir = %dir.as_ref().display(), "no configuration file, using defaults");
            Ok(FileConfig::default())
        }
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks for configuration files in standard locations and merges them
    /// according to precedence rules.
    pub fn discover_and_load(&self) -> Result<FileConfig, CheckhostError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        // Lowest precedence first
        for path in candidates.into_iter().flatten() {
            if let Ok(config) = self.load_file(&path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            warn!("Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "active"
                } else {
                    "overridden"
                };
                warn!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./checkhost.toml", "./.checkhost.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".checkhost.toml", "checkhost.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    ///
    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let path = default_config_dir()?.join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            outputs: match (lower.outputs, higher.outputs) {
                (Some(mut lower_outputs), Some(higher_outputs)) => {
                    if higher_outputs.root.is_some() {
                        lower_outputs.root = higher_outputs.root;
                    }
                    if higher_outputs.parent_directory.is_some() {
                        lower_outputs.parent_directory = higher_outputs.parent_directory;
                    }
                    lower_outputs.default_files = match (
                        lower_outputs.default_files,
                        higher_outputs.default_files,
                    ) {
                        (Some(lower_files), Some(higher_files)) => Some(DefaultFilesConfig {
                            dir_structure: higher_files.dir_structure.or(lower_files.dir_structure),
                            iana: higher_files.iana.or(lower_files.iana),
                            public_suffix: higher_files.public_suffix.or(lower_files.public_suffix),
                            inactive_db: higher_files.inactive_db.or(lower_files.inactive_db),
                            mining: higher_files.mining.or(lower_files.mining),
                            whois_db: higher_files.whois_db.or(lower_files.whois_db),
                        }),
                        (lower_files, higher_files) => higher_files.or(lower_files),
                    };
                    Some(lower_outputs)
                }
                (lower_outputs, higher_outputs) => higher_outputs.or(lower_outputs),
            },
            display: match (lower.display, higher.display) {
                (Some(lower_display), Some(higher_display)) => Some(DisplayConfig {
                    colour: higher_display.colour.or(lower_display.colour),
                    only_on_file: higher_display.only_on_file.or(lower_display.only_on_file),
                    hosts_ip: higher_display.hosts_ip.or(lower_display.hosts_ip),
                }),
                (lower_display, higher_display) => higher_display.or(lower_display),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), CheckhostError> {
        if let Some(outputs) = &config.outputs {
            if let Some(parent) = &outputs.parent_directory {
                if parent.trim().is_empty() {
                    return Err(CheckhostError::config(
                        "Output parent_directory cannot be empty",
                    ));
                }
                if Path::new(parent).is_absolute() {
                    return Err(CheckhostError::config(format!(
                        "Output parent_directory '{}' must be relative to the output root",
                        parent
                    )));
                }
            }

            if let Some(files) = &outputs.default_files {
                let named = [
                    ("dir_structure", &files.dir_structure),
                    ("iana", &files.iana),
                    ("public_suffix", &files.public_suffix),
                    ("inactive_db", &files.inactive_db),
                    ("mining", &files.mining),
                    ("whois_db", &files.whois_db),
                ];
                for (key, value) in named {
                    if let Some(name) = value {
                        if name.trim().is_empty() || name.contains('/') || name.contains('\\') {
                            return Err(CheckhostError::config(format!(
                                "Invalid file name '{}' for default_files.{}",
                                name, key
                            )));
                        }
                    }
                }
            }
        }

        if let Some(display) = &config.display {
            if let Some(ip) = &display.hosts_ip {
                if ip.trim().is_empty() || ip.contains(' ') {
                    return Err(CheckhostError::config(format!(
                        "Invalid hosts_ip '{}'",
                        ip
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Default configuration directory (`$XDG_CONFIG_HOME/checkhost` or
/// `~/.config/checkhost`).
pub fn default_config_dir() -> Option<PathBuf> {
    let config_dir = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

    Some(config_dir.join("checkhost"))
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via CH_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub config_dir: Option<String>,
    pub output_root: Option<String>,
    pub colour: Option<bool>,
    pub only_on_file: Option<bool>,
    pub hosts_ip: Option<String>,
}

/// Load configuration from environment variables.
///
/// Parses all CH_* environment variables. Invalid values are logged as
/// warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| {
        lookup(key).filter(|value| !value.trim().is_empty()).map(|value| {
            debug!("Using {}={}", key, value);
            value
        })
    };

    let flag = |key: &str| {
        let value = lookup(key)?;
        let parsed = parse_bool(&value);
        if parsed.is_none() {
            warn!("Invalid {}='{}', use true/false", key, value);
        }
        parsed
    };

    EnvConfig {
        config_dir: non_empty("CH_CONFIG_DIR"),
        output_root: non_empty("CH_OUTPUT_ROOT"),
        colour: flag("CH_COLOUR"),
        only_on_file: flag("CH_ONLY_ON_FILE"),
        hosts_ip: non_empty("CH_HOSTS_IP"),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
