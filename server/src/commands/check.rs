//! # DeviceHub Offline Status Check
//!
//! File: server/src/commands/check.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `devicehub check <ip>` runs the status simulator on a single address and
//! prints the result, without starting the server or touching any store.
//! Handy for predicting what the API will report for a device.
//!
//! ```bash
//! $ devicehub check 192.168.1.10
//! 192.168.1.10: online (simulated latency 30 ms)
//! $ devicehub check 192.168.1.11
//! 192.168.1.11: offline
//! ```
//!
use crate::common::inventory::{simulate_reachability, validate::is_valid_ip};
use crate::core::error::{DeviceError, FieldErrors, Result};
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// IPv4 or IPv6 address to evaluate.
    pub ip: String,
}

pub fn handle_check(args: CheckArgs) -> Result<()> {
    println!("{}", describe(&args.ip)?);
    Ok(())
}

/// Formats the simulated status line for `ip`, or fails if it is not an IP address.
fn describe(ip: &str) -> Result<String> {
    if !is_valid_ip(ip) {
        let mut details = FieldErrors::new();
        details.insert("ip_address".to_string(), "Invalid IP address".to_string());
        let err = anyhow::Error::new(DeviceError::invalid(details))
            .context(format!("'{}' is not a valid IPv4 or IPv6 address", ip));
        return Err(err);
    }

    let result = simulate_reachability(ip);
    debug!("Simulation result for {}: {:?}", ip, result);
    Ok(match result.response_time_ms {
        Some(ms) => format!("{}: {} (simulated latency {} ms)", ip, result.status(), ms),
        None => format!("{}: {}", ip, result.status()),
    })
}
