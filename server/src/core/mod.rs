//! # DeviceHub Core Infrastructure
//!
//! File: server/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: loading and validating the optional `.devicehub.toml` file
//! - `error`: the `DeviceError` enum and the application `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{DeviceError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
