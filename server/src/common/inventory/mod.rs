//! # Device Inventory (`common::inventory`)
//!
//! File: server/src/common/inventory/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The inventory is the whole domain of DeviceHub: a validated in-memory
//! device store plus a simulated status checker with a short-lived cache.
//!
//! ## Architecture
//!
//! - **`model`**: `Device`, `DevicePayload`, `ListFilter` and the enums behind them.
//! - **`validate`**: required-field, IP syntax and device-type checks.
//! - **`store`**: `DeviceStore`, the id-keyed record map that enforces IP uniqueness.
//! - **`status`**: `simulate_reachability` and the TTL-bound `StatusCache`.
//!
//! `Inventory` ties the store and the cache together so that a status check can
//! write `status`/`last_checked` back onto the device, and so that updates and
//! deletes drop stale cache entries. The API layer holds a single `Inventory`
//! behind a `tokio::sync::RwLock`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::inventory::{DevicePayload, Inventory};
//!
//! let mut inventory = Inventory::new(std::time::Duration::from_secs(10));
//! let body = br#"{"name":"edge","ip_address":"10.0.0.2","type":"router","location":"lab"}"#;
//! let device = inventory.create(&DevicePayload::from_json_bytes(body))?;
//! let report = inventory.check_status(&device.id)?;
//! assert_eq!(report.status.as_str(), "online");
//! ```
//!
pub mod model;
pub mod status;
pub mod store;
pub mod validate;

pub use model::{Device, DevicePayload, ListFilter};
pub use status::{simulate_reachability, StatusReport};

use crate::core::error::DeviceResult;
use chrono::{DateTime, Utc};
use status::StatusCache;
use std::time::{Duration, Instant};
use store::DeviceStore;
use tracing::debug;

/// Device store and status cache, mutated together.
#[derive(Debug)]
pub struct Inventory {
    store: DeviceStore,
    status_cache: StatusCache,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(status::DEFAULT_STATUS_TTL)
    }
}

impl Inventory {
    /// Creates an empty inventory whose status results stay fresh for `status_ttl`.
    pub fn new(status_ttl: Duration) -> Self {
        Self {
            store: DeviceStore::new(),
            status_cache: StatusCache::new(status_ttl),
        }
    }

    pub fn create(&mut self, payload: &DevicePayload) -> DeviceResult<Device> {
        self.store.create(payload)
    }

    pub fn get(&self, id: &str) -> DeviceResult<Device> {
        self.store.get(id).cloned()
    }

    pub fn list(&self, filter: &ListFilter) -> Vec<Device> {
        self.store.list(filter)
    }

    /// Replaces a device's fields and forgets its cached status.
    pub fn update(&mut self, id: &str, payload: &DevicePayload) -> DeviceResult<Device> {
        let device = self.store.update(id, payload)?;
        self.status_cache.invalidate(id);
        Ok(device)
    }

    pub fn delete(&mut self, id: &str) -> DeviceResult<()> {
        self.store.delete(id)?;
        self.status_cache.invalidate(id);
        Ok(())
    }

    /// # Check Status (`check_status`)
    ///
    /// Forces a fresh simulation for one device, ignoring the cache, and
    /// records the result on both the cache and the device.
    pub fn check_status(&mut self, id: &str) -> DeviceResult<StatusReport> {
        self.check_status_at(id, Instant::now(), Utc::now())
    }

    /// # All Statuses (`all_statuses`)
    ///
    /// Reports every device in creation order, reusing fresh cache entries and
    /// re-simulating the rest.
    pub fn all_statuses(&mut self) -> Vec<StatusReport> {
        self.all_statuses_at(Instant::now(), Utc::now())
    }

    fn check_status_at(
        &mut self,
        id: &str,
        now: Instant,
        timestamp: DateTime<Utc>,
    ) -> DeviceResult<StatusReport> {
        let device = self.store.get_mut(id)?;
        let reachability = simulate_reachability(&device.ip_address);
        let cached = self.status_cache.record(id, reachability, now, timestamp);

        device.status = cached.status;
        device.last_checked = Some(cached.last_checked);
        debug!(
            "Status check for {} ({}): {} {:?}ms",
            id, device.ip_address, cached.status, cached.response_time_ms
        );

        Ok(StatusReport {
            id: device.id.clone(),
            status: device.status,
            last_checked: device.last_checked,
        })
    }

    fn all_statuses_at(&mut self, now: Instant, timestamp: DateTime<Utc>) -> Vec<StatusReport> {
        let ids: Vec<String> = self.store.iter().map(|device| device.id.clone()).collect();
        let mut reports = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(cached) = self.status_cache.fresh(&id, now) {
                reports.push(StatusReport {
                    id,
                    status: cached.status,
                    last_checked: Some(cached.last_checked),
                });
                continue;
            }
            if let Ok(report) = self.check_status_at(&id, now, timestamp) {
                reports.push(report);
            }
        }
        reports
    }
}
