//! # DeviceHub Command Modules
//!
//! File: server/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! One module per top-level subcommand. Each defines its clap argument struct
//! and a `handle_*` function that `main.rs` dispatches to.
//!
//! ## Commands
//!
//! - `serve`: run the REST API
//! - `check`: print the simulated status for a single IP
//!

/// Prints the simulated reachability of one IP address.
pub mod check;
/// The REST API server: configuration, handlers and server loop.
pub mod serve;
