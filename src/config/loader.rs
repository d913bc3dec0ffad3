//! Resource file loading with precedence handling.
//!
//! The resource file sets the look of the bar (font, colours, window names,
//! alignment) and an optional default action string. Command-line flags are
//! applied on top, so a flag always beats the file.

use super::{flags, Alignment, Options};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the resource file.
pub const CONFIG_ENV: &str = "DZBAR_CONFIG";
/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "DZBAR_LOG_FILE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but cannot be used (e.g. an unknown colour).
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Resource key.
        key: &'static str,
        /// What was wrong.
        reason: String,
    },
}

/// Contents of `~/.config/dzbar/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Font name.
    #[serde(default)]
    pub font: Option<String>,

    /// Text colour (name or `#rrggbb`).
    #[serde(default)]
    pub foreground: Option<String>,

    /// Fill colour (name or `#rrggbb`).
    #[serde(default)]
    pub background: Option<String>,

    /// Header window name.
    #[serde(default)]
    pub title_name: Option<String>,

    /// Body window name.
    #[serde(default)]
    pub slave_name: Option<String>,

    /// Header alignment: `l`, `c` or `r`, as for `-ta`.
    #[serde(default)]
    pub title_align: Option<String>,

    /// Body alignment, as for `-sa`.
    #[serde(default)]
    pub slave_align: Option<String>,

    /// Action string used when `-e` is not given.
    #[serde(default)]
    pub actions: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Options and log path after file, environment and long options are merged.
/// The dzen-style flags are applied to `options` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Display and behaviour options.
    pub options: Options,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            options: Options::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// `<state dir>/dzbar/dzbar.log`, or `dzbar.log` in the working directory
/// when the platform has no state directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("dzbar").join("dzbar.log")
    } else {
        PathBuf::from("dzbar.log")
    }
}

/// Read and parse one resource file. A missing file yields `Ok(None)`.
///
/// # Errors
///
/// The file exists but cannot be read, or is not valid TOML for [`ConfigFile`].
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
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

/// `<config dir>/dzbar/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dzbar").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DZBAR_CONFIG` environment variable
/// 3. Default path `~/.config/dzbar/config.toml`
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
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Lay the resource file over the built-in defaults.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for a colour that cannot be parsed.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let mut resolved = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(resolved);
    };

    let options = &mut resolved.options;
    if let Some(font) = config.font {
        options.font = font;
    }
    if let Some(fg) = config.foreground {
        options.foreground = flags::color("foreground", &fg).map_err(|e| ConfigError::InvalidValue {
            key: "foreground",
            reason: e.to_string(),
        })?;
    }
    if let Some(bg) = config.background {
        options.background = flags::color("background", &bg).map_err(|e| ConfigError::InvalidValue {
            key: "background",
            reason: e.to_string(),
        })?;
    }
    if let Some(name) = config.title_name {
        options.title_name = name;
    }
    if let Some(name) = config.slave_name {
        options.slave_name = name;
    }
    if let Some(align) = config.title_align {
        options.title_align = Alignment::from_flag(&align);
    }
    if let Some(align) = config.slave_align {
        options.slave_align = Alignment::from_flag(&align);
    }
    if config.actions.is_some() {
        options.actions = config.actions;
    }
    if let Some(path) = config.log_file_path {
        resolved.log_file_path = path;
    }

    Ok(resolved)
}

/// `DZBAR_LOG_FILE`, when set and non-empty, replaces the log path.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        if !path.is_empty() {
            config.log_file_path = PathBuf::from(path);
        }
    }

    config
}

/// `--log-file` replaces the log path; it outranks every other source.
pub fn apply_cli_overrides(mut config: ResolvedConfig, log_file: Option<PathBuf>) -> ResolvedConfig {
    if let Some(path) = log_file {
        config.log_file_path = path;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
