//! # DeviceHub Server Configuration
//!
//! File: server/src/commands/serve/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds the effective `ServerConfig` for `devicehub serve` by combining:
//! 1. Command-line arguments / environment variables (highest priority)
//! 2. The `.devicehub.toml` file (see `core::config`)
//! 3. Default values (lowest priority)
//!
//! ## Architecture
//!
//! A flag overrides the file only when its value differs from the built-in
//! default, which is how clap-with-defaults tells "not given" apart from
//! "given". Environment variables feed the same flags (`PORT`,
//! `DEVICEHUB_HOST`, `STATUS_CACHE_TTL_SECONDS`), so they rank alongside them.
//!
//! ## Examples
//!
//! ```bash
//! # Defaults: 0.0.0.0:3001, 10 s status cache
//! devicehub serve
//!
//! # Loopback only, shorter cache
//! devicehub serve --host 127.0.0.1 --status-ttl 2
//!
//! # Environment-driven (e.g. inside a container)
//! PORT=8080 STATUS_CACHE_TTL_SECONDS=30 devicehub serve
//! ```
//!
use crate::core::config::{self, Config};
use crate::core::error::Result;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_STATUS_TTL_SECS: u64 = 10;

/// # Serve Command Arguments (`ServeArgs`)
///
/// Arguments accepted by `devicehub serve`.
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// IP address to bind to. `0.0.0.0` listens on all interfaces.
    #[arg(long, env = "DEVICEHUB_HOST", default_value_t = DEFAULT_HOST)]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, short, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds a simulated status result is reused by `GET /api/devices/status`.
    #[arg(long, env = "STATUS_CACHE_TTL_SECONDS", default_value_t = DEFAULT_STATUS_TTL_SECS)]
    pub status_ttl: u64,

    /// Path to a configuration file. Defaults to `.devicehub.toml` in the
    /// current directory, if present.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub status_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            status_ttl: Duration::from_secs(DEFAULT_STATUS_TTL_SECS),
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Loads the configuration file (explicit `--config` or the one in the current
/// directory) and merges the command-line arguments over it.
///
/// ## Errors
///
/// Returns an error if an explicit config file is missing, or a config file
/// cannot be read, parsed or validated.
pub fn load_and_merge_config(args: &ServeArgs) -> Result<ServerConfig> {
    let file_config = config::load_config(args.config.as_deref())?;
    let merged = merge(args, &file_config);
    debug!("Merged server configuration: {:?}", merged);
    Ok(merged)
}

/// Applies the file settings over the defaults, then explicitly-set arguments
/// over the result.
fn merge(args: &ServeArgs, file: &Config) -> ServerConfig {
    let defaults = ServerConfig::default();

    let file_host = file.server.host.as_deref().and_then(|host| match host.parse() {
        Ok(ip) => Some(ip),
        Err(e) => {
            warn!(
                "Invalid host '{}' in config file ({}), using default {}",
                host, e, defaults.host
            );
            None
        }
    });

    let host = if args.host != DEFAULT_HOST {
        args.host
    } else {
        file_host.unwrap_or(defaults.host)
    };
    let port = if args.port != DEFAULT_PORT {
        args.port
    } else {
        file.server.port.unwrap_or(defaults.port)
    };
    let status_ttl = if args.status_ttl != DEFAULT_STATUS_TTL_SECS {
        Duration::from_secs(args.status_ttl)
    } else {
        file.status
            .cache_ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.status_ttl)
    };

    ServerConfig {
        host,
        port,
        status_ttl,
    }
}
