//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, or a directory in its place).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
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
/// Corresponds to `~/.config/sift/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Start with tail-follow enabled.
    #[serde(default)]
    pub tail: Option<bool>,

    /// Syntax highlighting theme for the detail view.
    #[serde(default)]
    pub theme: Option<String>,

    /// Lines read before the first frame.
    #[serde(default)]
    pub initial_chunk_size: Option<usize>,

    /// Lines read per load-more request.
    #[serde(default)]
    pub load_more_chunk_size: Option<usize>,

    /// Lines read per batch while reading to the end.
    #[serde(default)]
    pub load_to_end_batch_size: Option<usize>,

    /// Distance from the end of the list that triggers a load-more.
    #[serde(default)]
    pub load_trigger_threshold: Option<usize>,

    /// Tick interval: tail polling and spinner animation.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub tail: bool,
    pub theme: String,
    pub initial_chunk_size: usize,
    pub load_more_chunk_size: usize,
    pub load_to_end_batch_size: usize,
    pub load_trigger_threshold: usize,
    pub poll_interval: Duration,
    /// Lines sampled when estimating the total line count.
    pub estimate_sample_size: usize,
    pub log_file_path: PathBuf,
}

/// Default syntax highlighting theme.
pub const DEFAULT_THEME: &str = "base16-ocean-dark";

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            tail: false,
            theme: DEFAULT_THEME.to_string(),
            initial_chunk_size: 1000,
            load_more_chunk_size: 500,
            load_to_end_batch_size: 1000,
            load_trigger_threshold: 100,
            poll_interval: Duration::from_millis(200),
            estimate_sample_size: 100,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/sift/sift.log` on Linux, the platform state
/// directory elsewhere, or `./sift.log` when there is none.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("sift").join("sift.log")
    } else {
        PathBuf::from("sift.log")
    }
}

/// Read and parse the config file at `path`.
///
/// A missing file yields `Ok(None)` and the defaults apply.
///
/// # Errors
///
/// Returns `ReadError` if the file exists but cannot be read, and
/// `ParseError` if it is not valid TOML or names an unknown key.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file");
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path,
                reason: e.to_string(),
            })
        }
    };

    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigError::ParseError {
            path,
            reason: e.to_string(),
        })
}

/// Resolve default config file path (`~/.config/sift/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sift").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SIFT_CONFIG` environment variable
/// 3. Default path `~/.config/sift/config.toml`
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

    if let Ok(env_path) = std::env::var("SIFT_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides (`SIFT_THEME`).
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(theme) = std::env::var("SIFT_THEME") {
        config.theme = theme;
    }
    config
}

/// Merge config file into defaults to create resolved config.
///
/// Zero sizes in the file are raised to 1 so every read makes progress.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        tail: config.tail.unwrap_or(defaults.tail),
        theme: config.theme.unwrap_or(defaults.theme),
        initial_chunk_size: config
            .initial_chunk_size
            .unwrap_or(defaults.initial_chunk_size)
            .max(1),
        load_more_chunk_size: config
            .load_more_chunk_size
            .unwrap_or(defaults.load_more_chunk_size)
            .max(1),
        load_to_end_batch_size: config
            .load_to_end_batch_size
            .unwrap_or(defaults.load_to_end_batch_size)
            .max(1),
        load_trigger_threshold: config
            .load_trigger_threshold
            .unwrap_or(defaults.load_trigger_threshold),
        poll_interval: config
            .poll_interval_ms
            .map(|ms| Duration::from_millis(ms.max(1)))
            .unwrap_or(defaults.poll_interval),
        estimate_sample_size: defaults.estimate_sample_size,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest).
/// `tail_flag` can only turn tail-follow on.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    theme_override: Option<String>,
    tail_flag: bool,
) -> ResolvedConfig {
    if let Some(theme) = theme_override {
        config.theme = theme;
    }
    if tail_flag {
        config.tail = true;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
