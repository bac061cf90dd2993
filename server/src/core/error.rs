//! # DeviceHub Error Types
//!
//! File: server/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout DeviceHub. Inventory
//! operations return the typed `DeviceError`, which the API layer maps onto
//! HTTP status codes. Startup and CLI code use the `anyhow`-backed `Result<T>`
//! alias so that I/O and parsing failures can carry context.
//!
//! ## Architecture
//!
//! - `DeviceError`: a `thiserror` enum for the failures callers branch on
//!   (validation, missing device, bad configuration).
//! - `FieldErrors`: the `field -> message` map attached to validation failures.
//! - `DeviceResult<T>`: `Result` over `DeviceError`, returned by inventory operations.
//! - `Result<T>`: alias for `anyhow::Result<T>`.
//!
//! ## Examples
//!
//! ```rust
//! match inventory.get(&id) {
//!     Ok(device) => println!("{}", device.name),
//!     Err(DeviceError::NotFound { id }) => println!("no device {}", id),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, keyed by the JSON field name.
/// A `BTreeMap` keeps the serialized order stable.
pub type FieldErrors = BTreeMap<String, String>;

/// Errors produced by inventory operations and configuration handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The request was rejected: missing/invalid fields or a duplicate IP.
    #[error("{message}")]
    Validation {
        message: String,
        details: FieldErrors,
    },

    #[error("Device '{id}' not found.")]
    NotFound { id: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeviceError {
    /// Builds the generic "Invalid request" validation error from collected field errors.
    pub fn invalid(details: FieldErrors) -> Self {
        DeviceError::Validation {
            message: "Invalid request".to_string(),
            details,
        }
    }

    /// Builds the validation error reported when another device already owns `ip_address`.
    pub fn duplicate_ip() -> Self {
        let mut details = FieldErrors::new();
        details.insert("ip_address".to_string(), "Duplicate".to_string());
        DeviceError::Validation {
            message: "Duplicate IP address".to_string(),
            details,
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        DeviceError::NotFound { id: id.into() }
    }
}

/// Result of an inventory operation; callers match on the `DeviceError` variant.
pub type DeviceResult<T> = std::result::Result<T, DeviceError>;

/// Type alias for Result using anyhow::Error for application-level code.
pub type Result<T> = anyhow::Result<T>;
