//! # DeviceHub Common Modules (`common`)
//!
//! File: server/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared logic used by more than one command, kept apart from the command
//! handlers (`commands::`) and core infrastructure (`core::`).
//!
//! - **`inventory`**: the device store, payload validation and the simulated
//!   status checker. Used by `serve` (through the HTTP API) and by `check`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::inventory::{simulate_reachability, Inventory};
//! ```
//!

/// Device records, validation and simulated reachability.
pub mod inventory;
