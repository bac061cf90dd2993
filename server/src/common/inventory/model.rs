//! # Inventory Data Model
//!
//! File: server/src/common/inventory/model.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Types shared by the store, the validator, the status simulator and the API:
//! - `Device`: a stored record, serialized as-is in API responses.
//! - `DevicePayload`: an unvalidated create/update request body.
//! - `NewDevice`: the validated fields extracted from a payload.
//! - `ListFilter` / `SortKey`: query options for listing devices.
//!
//! `DevicePayload` holds raw JSON values rather than strings so that a field of
//! the wrong type becomes a validation message instead of a body rejection.
//!
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Category of a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Router,
    Switch,
    Server,
    Other,
}

impl DeviceType {
    /// Every accepted type, in the order they are listed in error messages.
    pub const ALL: [DeviceType; 4] = [
        DeviceType::Router,
        DeviceType::Switch,
        DeviceType::Server,
        DeviceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Router => "router",
            DeviceType::Switch => "switch",
            DeviceType::Server => "server",
            DeviceType::Other => "other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown device type '{}'", s))
    }
}

/// Reachability state of a device as last reported by the status simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    /// Never checked since creation.
    #[default]
    Unknown,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device record held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// UUID v4 assigned at creation. Never changes.
    pub id: String,
    pub name: String,
    pub ip_address: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub location: String,
    pub status: DeviceStatus,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Raw request body for creating or replacing a device.
///
/// Unknown JSON keys are ignored. A key that is present with `null` is kept as
/// `Some(Value::Null)` so the validator can tell it apart from a missing key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DevicePayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub ip_address: Option<Value>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub device_type: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Value>,
}

/// Maps any present value, including `null`, to `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl DevicePayload {
    /// Parses a request body. Anything that is not a JSON object is treated as
    /// an empty payload, so it fails validation with "required" messages.
    pub fn from_json_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
impl DevicePayload {
    /// Fully populated string payload.
    pub fn new(name: &str, ip_address: &str, device_type: &str, location: &str) -> Self {
        Self {
            name: Some(Value::from(name)),
            ip_address: Some(Value::from(ip_address)),
            device_type: Some(Value::from(device_type)),
            location: Some(Value::from(location)),
        }
    }
}

/// Validated device fields, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub ip_address: String,
    pub device_type: DeviceType,
    pub location: String,
}

/// Fields a device listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    IpAddress,
    Type,
    Location,
    Status,
    LastChecked,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "ip_address" => Ok(SortKey::IpAddress),
            "type" => Ok(SortKey::Type),
            "location" => Ok(SortKey::Location),
            "status" => Ok(SortKey::Status),
            "last_checked" => Ok(SortKey::LastChecked),
            other => Err(format!("unsupported sort field '{}'", other)),
        }
    }
}

impl SortKey {
    /// Orders two devices by this key. Devices never checked sort after
    /// checked ones when ordering by `last_checked`.
    pub fn compare(&self, a: &Device, b: &Device) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::IpAddress => a.ip_address.cmp(&b.ip_address),
            SortKey::Type => a.device_type.as_str().cmp(b.device_type.as_str()),
            SortKey::Location => a.location.cmp(&b.location),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::LastChecked => match (a.last_checked, b.last_checked) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Query options for `GET /api/devices`. Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub device_type: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

impl ListFilter {
    /// Builds a filter from decoded query pairs. When a key is repeated the
    /// first value wins; unrelated keys are ignored.
    pub fn from_query_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "type" => &mut filter.device_type,
                "status" => &mut filter.status,
                "sort" => &mut filter.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        filter
    }

    pub fn matches(&self, device: &Device) -> bool {
        let type_ok = match non_empty(&self.device_type) {
            Some(t) => device.device_type.as_str() == t,
            None => true,
        };
        let status_ok = match non_empty(&self.status) {
            Some(s) => device.status.as_str() == s,
            None => true,
        };
        type_ok && status_ok
    }

    /// The requested sort key, if one was given and is recognised.
    pub fn sort_key(&self) -> Option<SortKey> {
        non_empty(&self.sort).and_then(|s| s.parse().ok())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
