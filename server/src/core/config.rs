//! # DeviceHub Configuration File
//!
//! File: server/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Loads and validates the optional `.devicehub.toml` configuration file. The
//! file only supplies defaults; command-line flags and environment variables
//! are merged on top of it by `commands::serve::config`.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags / environment variables (handled by the serve command)
//! 2. The file given with `--config`, or `.devicehub.toml` in the current directory
//! 3. Default values defined in code
//!
//! Every field in the file is optional so users only write what they change.
//! Unknown keys are rejected to catch typos early.
//!
//! ## Examples
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [status]
//! cache_ttl_seconds = 30
//! ```
//!
use crate::core::error::{DeviceError, Result};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Name of the configuration file looked up in the current working directory.
pub const CONFIG_FILE_NAME: &str = ".devicehub.toml";

/// Top-level structure of `.devicehub.toml`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub status: StatusSection,
}

/// `[server]`: where the HTTP API listens.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Kept as a string so a bad value can fall back to the default with a warning.
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `[status]`: status simulator settings.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StatusSection {
    /// How long a simulated status result is reused, in seconds.
    pub cache_ttl_seconds: Option<u64>,
}

/// # Load Configuration (`load_config`)
///
/// Resolves and loads the configuration file.
///
/// * With `explicit_path`, that file must exist; a missing file is an error.
/// * Without it, `.devicehub.toml` in the current directory is used if present,
///   otherwise an empty `Config` (all defaults) is returned.
///
/// The loaded configuration is validated before being returned.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    let path = match explicit_path {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!(DeviceError::Config(format!(
                    "Configuration file '{}' does not exist or is not a file.",
                    path.display()
                ))));
            }
            Some(path.to_path_buf())
        }
        None => {
            let current_dir =
                std::env::current_dir().context("Failed to get current working directory")?;
            find_config_in(&current_dir)
        }
    };

    let config = match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(&path)?
        }
        None => {
            debug!("No {} found; using built-in defaults.", CONFIG_FILE_NAME);
            Config::default()
        }
    };

    validate_config(&config).context("Configuration validation failed")?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Returns the path of `.devicehub.toml` inside `dir`, if it exists as a file.
fn find_config_in(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == Some(0) {
        return Err(anyhow!(DeviceError::Config(
            "server.port must be between 1 and 65535.".to_string()
        )));
    }
    if let Some(host) = &config.server.host {
        if host.trim().is_empty() {
            return Err(anyhow!(DeviceError::Config(
                "server.host cannot be empty.".to_string()
            )));
        }
    }
    Ok(())
}
