//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Dark color theme.
pub const THEME_DARK: &str = "dark";
/// Light color theme.
pub const THEME_LIGHT: &str = "light";
/// Every theme the renderer knows.
pub const VALID_THEMES: &[&str] = &[THEME_DARK, THEME_LIGHT];

/// Environment variable naming an explicit config file.
const CONFIG_ENV: &str = "RUNLOG_CONFIG";
/// Environment variable overriding the theme.
const THEME_ENV: &str = "RUNLOG_THEME";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/runlog/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Theme name (`"dark"` or `"light"`).
    #[serde(default)]
    pub theme: Option<String>,

    /// Lines read per batch before an update is pushed.
    #[serde(default)]
    pub batch_lines: Option<usize>,

    /// Start tasks expanded.
    #[serde(default)]
    pub expand_tasks: Option<bool>,

    /// Expand failed scopes and their ancestors.
    #[serde(default)]
    pub expand_failures: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Width of the rendered text output.
    #[serde(default)]
    pub viewport_width: Option<u16>,

    /// Height of the rendered text output.
    #[serde(default)]
    pub viewport_height: Option<u16>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Theme name.
    pub theme: String,
    /// Lines per batch.
    pub batch_lines: usize,
    /// Start tasks expanded.
    pub expand_tasks: bool,
    /// Expand failures.
    pub expand_failures: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Output width.
    pub viewport_width: u16,
    /// Output height.
    pub viewport_height: u16,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            theme: THEME_DARK.to_string(),
            batch_lines: 1000,
            expand_tasks: true,
            expand_failures: true,
            log_file_path: default_log_path(),
            viewport_width: 100,
            viewport_height: 40,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/runlog/runlog.log` on Linux, the platform state
/// directory elsewhere, or `runlog.log` in the current directory when no
/// state directory exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("runlog").join("runlog.log"),
        None => PathBuf::from("runlog.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path: `~/.config/runlog/config.toml` on Linux.
///
/// Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("runlog").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `RUNLOG_CONFIG` environment variable
/// 3. Default path `~/.config/runlog/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Apply environment variable overrides (`RUNLOG_THEME`).
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(theme) = std::env::var(THEME_ENV) {
        config.theme = theme;
    }
    config
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        theme: config.theme.unwrap_or(defaults.theme),
        batch_lines: config.batch_lines.unwrap_or(defaults.batch_lines),
        expand_tasks: config.expand_tasks.unwrap_or(defaults.expand_tasks),
        expand_failures: config.expand_failures.unwrap_or(defaults.expand_failures),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        viewport_width: config.viewport_width.unwrap_or(defaults.viewport_width),
        viewport_height: config.viewport_height.unwrap_or(defaults.viewport_height),
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--theme`
    pub theme: Option<String>,
    /// `--batch-lines`
    pub batch_lines: Option<usize>,
    /// `--width`
    pub viewport_width: Option<u16>,
    /// `--height`
    pub viewport_height: Option<u16>,
    /// `--log-file`
    pub log_file_path: Option<PathBuf>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence. Only flags the user actually
/// passed override anything.
///
/// # Examples
///
/// ```
/// use runlog::config::{apply_cli_overrides, CliOverrides, ResolvedConfig};
///
/// let config = apply_cli_overrides(
///     ResolvedConfig::default(),
///     CliOverrides { viewport_width: Some(60), ..CliOverrides::default() },
/// );
/// assert_eq!(config.viewport_width, 60);
/// assert_eq!(config.theme, "dark");
/// ```
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(batch_lines) = cli.batch_lines {
        config.batch_lines = batch_lines;
    }
    if let Some(width) = cli.viewport_width {
        config.viewport_width = width;
    }
    if let Some(height) = cli.viewport_height {
        config.viewport_height = height;
    }
    if let Some(path) = cli.log_file_path {
        config.log_file_path = path;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
