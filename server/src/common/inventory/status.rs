//! # Simulated Reachability
//!
//! File: server/src/common/inventory/status.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! No packets are sent. A device's status is derived from its IP address:
//! the digits of the segment after the last `.` form a number, and an even
//! number means "online". Online devices also get a pseudo-latency of
//! `20 + (n % 50)` milliseconds.
//!
//! Results are memoized per device id in a `StatusCache` for a configurable
//! TTL. Freshness checks take the current `Instant` as an argument so callers
//! (and tests) control the clock.
//!
use super::model::DeviceStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::trace;

/// Default time a simulated result stays fresh.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(10);

/// Base of the pseudo-latency reported for reachable devices.
const BASE_LATENCY_MS: u32 = 20;
/// Spread of the pseudo-latency (`n % LATENCY_SPREAD_MS`).
const LATENCY_SPREAD_MS: u32 = 50;

/// Outcome of a simulated reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reachability {
    pub reachable: bool,
    /// Only set when `reachable` is true.
    pub response_time_ms: Option<u32>,
}

impl Reachability {
    pub fn status(&self) -> DeviceStatus {
        if self.reachable {
            DeviceStatus::Online
        } else {
            DeviceStatus::Offline
        }
    }
}

/// # Simulate Reachability (`simulate_reachability`)
///
/// Derives a deterministic result from `ip`. Works on any string: IPv6
/// addresses have no `.`, so the digits of the whole address are used, and a
/// segment without digits counts as `0` (online).
///
/// Only the parity and the value modulo 50 are needed, so the digits are
/// folded incrementally and arbitrarily long inputs cannot overflow.
pub fn simulate_reachability(ip: &str) -> Reachability {
    let last_segment = ip.rsplit('.').next().unwrap_or(ip);

    let mut last_digit = 0u32;
    let mut modulo = 0u32;
    for digit in last_segment.chars().filter_map(|c| c.to_digit(10)) {
        last_digit = digit;
        modulo = (modulo * 10 + digit) % LATENCY_SPREAD_MS;
    }

    let reachable = last_digit % 2 == 0;
    let result = Reachability {
        reachable,
        response_time_ms: reachable.then_some(BASE_LATENCY_MS + modulo),
    };
    trace!("Simulated reachability for {}: {:?}", ip, result);
    result
}

/// Status reported for a single device by the status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub id: String,
    pub status: DeviceStatus,
    pub last_checked: Option<DateTime<Utc>>,
}

/// A memoized simulation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedStatus {
    pub status: DeviceStatus,
    pub last_checked: DateTime<Utc>,
    pub response_time_ms: Option<u32>,
    checked_at: Instant,
}

/// Per-device cache of simulation results.
#[derive(Debug, Clone)]
pub struct StatusCache {
    ttl: Duration,
    entries: HashMap<String, CachedStatus>,
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL)
    }
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Stores a result for `id`, replacing any previous entry.
    pub fn record(
        &mut self,
        id: &str,
        reachability: Reachability,
        now: Instant,
        checked_at: DateTime<Utc>,
    ) -> &CachedStatus {
        let entry = CachedStatus {
            status: reachability.status(),
            last_checked: checked_at,
            response_time_ms: reachability.response_time_ms,
            checked_at: now,
        };
        self.entries.insert(id.to_string(), entry);
        &self.entries[id]
    }

    /// Returns the entry for `id` if it was recorded no more than `ttl` before `now`.
    pub fn fresh(&self, id: &str, now: Instant) -> Option<&CachedStatus> {
        self.entries
            .get(id)
            .filter(|entry| now.saturating_duration_since(entry.checked_at) <= self.ttl)
    }

    /// Drops the entry for `id`, if any.
    pub fn invalidate(&mut self, id: &str) {
        self.entries.remove(id);
    }
}
