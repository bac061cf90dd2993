//! # DeviceHub Integration Test Common Helpers
//!
//! File: server/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `server/tests/`. Each test file
//! declares `mod common;` and calls `devicehub_cmd()` to run the compiled
//! binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get DeviceHub Command (`devicehub_cmd`)
///
/// Returns an `assert_cmd::Command` for the `devicehub` binary built for this
/// test run, with the environment variables that feed `serve` flags cleared so
/// the host environment cannot change test outcomes.
///
/// ## Panics
/// Panics if the `devicehub` binary cannot be found via `Command::cargo_bin`.
pub fn devicehub_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("devicehub").expect("Failed to find devicehub binary for testing");
    cmd.env_remove("PORT")
        .env_remove("DEVICEHUB_HOST")
        .env_remove("STATUS_CACHE_TTL_SECONDS")
        .env_remove("RUST_LOG");
    cmd
}
