//! # In-Memory Device Store
//!
//! File: server/src/common/inventory/store.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Holds device records keyed by id and remembers insertion order so listings
//! are stable. All mutations validate their payload first, then enforce that no
//! two devices share an `ip_address`.
//!
//! Nothing is persisted: the store lives and dies with the process.
//!
use super::model::{Device, DevicePayload, DeviceStatus, ListFilter};
use super::validate::validate_payload;
use crate::core::error::{DeviceError, DeviceResult};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: HashMap<String, Device>,
    /// Ids in creation order.
    order: Vec<String>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over devices in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.order.iter().filter_map(|id| self.devices.get(id))
    }

    /// # Create Device (`create`)
    ///
    /// Validates `payload`, rejects an IP already used by another device, and
    /// stores a new record with a fresh UUID, status `unknown` and no
    /// `last_checked` timestamp.
    pub fn create(&mut self, payload: &DevicePayload) -> DeviceResult<Device> {
        let new = validate_payload(payload)?;
        if self.has_duplicate_ip(&new.ip_address, None) {
            debug!("Rejected create: IP {} already in use", new.ip_address);
            return Err(DeviceError::duplicate_ip());
        }

        let id = Uuid::new_v4().to_string();
        let device = Device {
            id: id.clone(),
            name: new.name,
            ip_address: new.ip_address,
            device_type: new.device_type,
            location: new.location,
            status: DeviceStatus::Unknown,
            last_checked: None,
        };
        info!("Created device {} ({}, {})", id, device.name, device.ip_address);

        self.devices.insert(id.clone(), device.clone());
        self.order.push(id);
        Ok(device)
    }

    pub fn get(&self, id: &str) -> DeviceResult<&Device> {
        debug!("Looking up device {}", id);
        self.devices.get(id).ok_or_else(|| DeviceError::not_found(id))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> DeviceResult<&mut Device> {
        self.devices
            .get_mut(id)
            .ok_or_else(|| DeviceError::not_found(id))
    }

    /// # List Devices (`list`)
    ///
    /// Returns clones of the devices matching `filter`, in creation order, or
    /// stably sorted by the filter's sort key if it names a known field.
    pub fn list(&self, filter: &ListFilter) -> Vec<Device> {
        let mut devices: Vec<Device> = self
            .iter()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect();

        match filter.sort_key() {
            Some(key) => devices.sort_by(|a, b| key.compare(a, b)),
            None => {
                if let Some(sort) = filter.sort.as_deref().filter(|s| !s.is_empty()) {
                    debug!("Ignoring unsupported sort field '{}'", sort);
                }
            }
        }
        devices
    }

    /// # Update Device (`update`)
    ///
    /// Replaces name, IP, type and location of an existing device. The id,
    /// status and `last_checked` are kept. The device may keep its own IP;
    /// taking another device's IP is rejected.
    pub fn update(&mut self, id: &str, payload: &DevicePayload) -> DeviceResult<Device> {
        if !self.devices.contains_key(id) {
            return Err(DeviceError::not_found(id));
        }
        let new = validate_payload(payload)?;
        if self.has_duplicate_ip(&new.ip_address, Some(id)) {
            debug!("Rejected update of {}: IP {} already in use", id, new.ip_address);
            return Err(DeviceError::duplicate_ip());
        }

        let device = self.get_mut(id)?;
        device.name = new.name;
        device.ip_address = new.ip_address;
        device.device_type = new.device_type;
        device.location = new.location;
        info!("Updated device {}", id);
        Ok(device.clone())
    }

    /// Removes a device and returns the removed record.
    pub fn delete(&mut self, id: &str) -> DeviceResult<Device> {
        let device = self
            .devices
            .remove(id)
            .ok_or_else(|| DeviceError::not_found(id))?;
        self.order.retain(|existing| existing != id);
        info!("Deleted device {}", id);
        Ok(device)
    }

    fn has_duplicate_ip(&self, ip: &str, exclude_id: Option<&str>) -> bool {
        self.devices
            .values()
            .filter(|device| Some(device.id.as_str()) != exclude_id)
            .any(|device| device.ip_address == ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::inventory::model::DeviceType;

    fn payload(name: &str, ip: &str, kind: &str) -> DevicePayload {
        DevicePayload::new(name, ip, kind, "lab")
    }

    fn assert_validation(err: DeviceError, expected_message: &str) {
        match err {
            DeviceError::Validation { message, .. } => assert_eq!(message, expected_message),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let mut store = DeviceStore::new();
        let created = store.create(&payload("edge", "10.0.0.1", "router")).unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.status, DeviceStatus::Unknown);
        assert_eq!(created.last_checked, None);

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched, &created);
        assert_eq!(fetched.name, "edge");
        assert_eq!(fetched.ip_address, "10.0.0.1");
        assert_eq!(fetched.device_type, DeviceType::Router);
        assert_eq!(fetched.location, "lab");
    }

    #[test]
    fn test_create_duplicate_ip_rejected() {
        let mut store = DeviceStore::new();
        store.create(&payload("a", "10.0.0.1", "router")).unwrap();
        let err = store.create(&payload("b", "10.0.0.1", "switch")).unwrap_err();
        assert_validation(err, "Duplicate IP address");
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_create_invalid_payload_checked_before_duplicates() {
        let mut store = DeviceStore::new();
        store.create(&payload("a", "10.0.0.1", "router")).unwrap();
        let err = store.create(&payload("", "10.0.0.1", "router")).unwrap_err();
        assert_validation(err, "Invalid request");
    }

    #[test]
    fn test_create_malformed_ip_rejected() {
        let mut store = DeviceStore::new();
        let err = store.create(&payload("a", "10.0.0.1.5", "router")).unwrap_err();
        assert_validation(err, "Invalid request");
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_get_missing() {
        let store = DeviceStore::new();
        assert_eq!(
            store.get("nope").unwrap_err(),
            DeviceError::not_found("nope")
        );
    }

    #[test]
    fn test_update_then_get_reflects_changes() {
        let mut store = DeviceStore::new();
        let created = store.create(&payload("a", "10.0.0.1", "router")).unwrap();

        let updated = store
            .update(&created.id, &DevicePayload::new("a2", "10.0.0.9", "server", "dc-2"))
            .unwrap();
        assert_eq!(updated.id, created.id);

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched.name, "a2");
        assert_eq!(fetched.ip_address, "10.0.0.9");
        assert_eq!(fetched.device_type, DeviceType::Server);
        assert_eq!(fetched.location, "dc-2");
    }

    #[test]
    fn test_update_may_keep_own_ip() {
        let mut store = DeviceStore::new();
        let created = store.create(&payload("a", "10.0.0.1", "router")).unwrap();
        let updated = store
            .update(&created.id, &payload("renamed", "10.0.0.1", "router"))
            .unwrap();
        assert_eq!(updated.name, "renamed");
    }

    #[test]
    fn test_update_to_other_devices_ip_rejected() {
        let mut store = DeviceStore::new();
        store.create(&payload("a", "10.0.0.1", "router")).unwrap();
        let b = store.create(&payload("b", "10.0.0.2", "router")).unwrap();

        let err = store.update(&b.id, &payload("b", "10.0.0.1", "router")).unwrap_err();
        assert_validation(err, "Duplicate IP address");
        assert_eq!(store.get(&b.id).unwrap().ip_address, "10.0.0.2");
    }

    #[test]
    fn test_update_malformed_ip_rejected() {
        let mut store = DeviceStore::new();
        let a = store.create(&payload("a", "10.0.0.1", "router")).unwrap();
        let err = store.update(&a.id, &payload("a", "not-an-ip", "router")).unwrap_err();
        assert_validation(err, "Invalid request");
    }

    #[test]
    fn test_update_missing_is_not_found_even_with_bad_payload() {
        let mut store = DeviceStore::new();
        let err = store.update("ghost", &DevicePayload::default()).unwrap_err();
        assert_eq!(err, DeviceError::not_found("ghost"));
    }

    #[test]
    fn test_delete() {
        let mut store = DeviceStore::new();
        let a = store.create(&payload("a", "10.0.0.1", "router")).unwrap();
        let removed = store.delete(&a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert!(store.get(&a.id).is_err());
        assert_eq!(store.iter().count(), 0);

        // The IP is free again.
        store.create(&payload("a", "10.0.0.1", "router")).unwrap();
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = DeviceStore::new();
        assert_eq!(
            store.delete("ghost").unwrap_err(),
            DeviceError::not_found("ghost")
        );
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let mut store = DeviceStore::new();
        store.create(&payload("charlie", "10.0.0.3", "switch")).unwrap();
        store.create(&payload("alpha", "10.0.0.1", "router")).unwrap();
        store.create(&payload("bravo", "10.0.0.2", "switch")).unwrap();

        let names = |devices: Vec<Device>| -> Vec<String> {
            devices.into_iter().map(|d| d.name).collect()
        };

        assert_eq!(
            names(store.list(&ListFilter::default())),
            vec!["charlie", "alpha", "bravo"]
        );

        let switches = ListFilter {
            device_type: Some("switch".into()),
            ..Default::default()
        };
        assert_eq!(names(store.list(&switches)), vec!["charlie", "bravo"]);

        let sorted = ListFilter {
            sort: Some("name".into()),
            ..Default::default()
        };
        assert_eq!(names(store.list(&sorted)), vec!["alpha", "bravo", "charlie"]);

        let unknown_sort = ListFilter {
            sort: Some("uptime".into()),
            ..Default::default()
        };
        assert_eq!(
            names(store.list(&unknown_sort)),
            vec!["charlie", "alpha", "bravo"]
        );

        let online = ListFilter {
            status: Some("online".into()),
            ..Default::default()
        };
        assert!(store.list(&online).is_empty());
    }
}
