//! Configuration loading and discovery for `depthaa.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::DepthaaConfig;
use crate::output::OutputFormat;
use crate::sampler::FilterMode;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "depthaa.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse depthaa.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override depth sampling mode
    pub mode: Option<FilterMode>,
    /// Override output encoding
    pub format: Option<OutputFormat>,
    /// Override output suffix
    pub suffix: Option<String>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Find depthaa.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for depthaa.toml
/// 2. Check XDG_CONFIG_HOME/depthaa/depthaa.toml (or ~/.config/depthaa/depthaa.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find depthaa.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("depthaa").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find depthaa.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a depthaa.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("shots/depthaa.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<DepthaaConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => {
            tracing::debug!("no depthaa.toml found, using defaults");
            Ok(default_config())
        }
    }
}

fn load_config_file(path: &Path) -> Result<DepthaaConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: DepthaaConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no depthaa.toml is found.
pub fn default_config() -> DepthaaConfig {
    DepthaaConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut DepthaaConfig, overrides: &CliOverrides) {
    if let Some(mode) = overrides.mode {
        config.sampling.mode = mode;
    }

    if let Some(format) = overrides.format {
        config.output.format = format;
    }

    if let Some(ref suffix) = overrides.suffix {
        config.output.suffix = suffix.clone();
    }

    if let Some(jobs) = overrides.jobs {
        config.run.jobs = jobs;
    }
}
