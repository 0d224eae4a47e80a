//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

use super::EngineConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DIFFSYNC_CONFIG";

/// Environment variable overriding `render_side_by_side`.
pub const SIDE_BY_SIDE_ENV: &str = "DIFFSYNC_SIDE_BY_SIDE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
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
/// Corresponds to `~/.config/diffsync/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Render the two buffers next to each other.
    #[serde(default)]
    pub render_side_by_side: Option<bool>,

    /// Draw single-line hunks as inline decorations in inline mode.
    #[serde(default)]
    pub use_true_inline_diff_rendering: Option<bool>,

    /// Show revert affordances next to pure deletions.
    #[serde(default)]
    pub render_margin_revert_icon: Option<bool>,

    /// Delay before a vanished moved-block padding is removed.
    #[serde(default)]
    pub top_padding_reset_delay_ms: Option<u64>,

    /// Length of scroll-offset animations.
    #[serde(default)]
    pub scroll_animation_ms: Option<u64>,

    /// Path to log file for tracing output; stderr when unset.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Options handed to the engine.
    pub engine: EngineConfig,
    /// Path to log file for tracing output.
    pub log_file_path: Option<PathBuf>,
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

/// Resolve default config file path.
///
/// Returns `~/.config/diffsync/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("diffsync").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DIFFSYNC_CONFIG` environment variable
/// 3. Default path `~/.config/diffsync/config.toml`
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

    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let engine = defaults.engine;
    ResolvedConfig {
        engine: EngineConfig {
            render_side_by_side: config
                .render_side_by_side
                .unwrap_or(engine.render_side_by_side),
            use_true_inline_diff_rendering: config
                .use_true_inline_diff_rendering
                .unwrap_or(engine.use_true_inline_diff_rendering),
            render_margin_revert_icon: config
                .render_margin_revert_icon
                .unwrap_or(engine.render_margin_revert_icon),
            top_padding_reset_delay_ms: config
                .top_padding_reset_delay_ms
                .unwrap_or(engine.top_padding_reset_delay_ms),
            scroll_animation_ms: config
                .scroll_animation_ms
                .unwrap_or(engine.scroll_animation_ms),
        },
        log_file_path: config.log_file_path.or(defaults.log_file_path),
    }
}

/// Parse a boolean environment value: `1/true/yes/on` or `0/false/no/off`.
fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `DIFFSYNC_SIDE_BY_SIDE`: override `render_side_by_side`
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(SIDE_BY_SIDE_ENV) {
        match parse_env_bool(&value) {
            Some(side_by_side) => config.engine.render_side_by_side = side_by_side,
            None => warn!(value = %value, "ignoring unparseable {SIDE_BY_SIDE_ENV}"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    side_by_side_override: Option<bool>,
    true_inline_override: Option<bool>,
    revert_icon_override: Option<bool>,
    log_file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(side_by_side) = side_by_side_override {
        config.engine.render_side_by_side = side_by_side;
    }

    if let Some(true_inline) = true_inline_override {
        config.engine.use_true_inline_diff_rendering = true_inline;
    }

    if let Some(revert_icon) = revert_icon_override {
        config.engine.render_margin_revert_icon = revert_icon;
    }

    if let Some(path) = log_file_override {
        config.log_file_path = Some(path);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
