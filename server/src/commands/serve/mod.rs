//! # DeviceHub API Server
//!
//! File: server/src/commands/serve/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `devicehub serve` runs the REST API over an in-memory device inventory.
//! Records are lost when the process exits.
//!
//! ## Architecture
//!
//! - `config.rs`: `ServeArgs` and merging them with `.devicehub.toml`
//! - `handlers.rs`: Axum handlers, shared `AppState`, JSON error mapping
//! - `server_logic.rs`: router construction, listener, graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! devicehub serve --port 8080
//! curl -X POST localhost:8080/api/devices \
//!      -H 'content-type: application/json' \
//!      -d '{"name":"edge","ip_address":"10.0.0.2","type":"router","location":"lab"}'
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

pub mod config;
pub mod handlers;
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Resolves the effective configuration and runs the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let config = config::load_and_merge_config(&args)?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config).await
}
