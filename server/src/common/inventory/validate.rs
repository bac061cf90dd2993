//! # Device Payload Validation
//!
//! File: server/src/common/inventory/validate.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns a raw `DevicePayload` into a `NewDevice`, or reports every problem
//! with it at once as a `DeviceError::Validation` whose details map each
//! offending field to a message.
//!
//! Rules:
//! - `name`, `ip_address`, `type`, `location` are required (missing, `null`
//!   and `""` all count as absent).
//! - A present `ip_address` must parse as IPv4 or IPv6, otherwise it is
//!   reported as invalid rather than missing.
//! - A present `type` must be one of the `DeviceType` values.
//!
//! IP uniqueness is a store-level concern and is checked in `store.rs`.
//!
use super::model::{DevicePayload, DeviceType, NewDevice};
use crate::core::error::{DeviceError, DeviceResult, FieldErrors};
use serde_json::Value;
use std::net::IpAddr;

/// True if `ip` is a syntactically valid IPv4 or IPv6 address.
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Validates a payload, collecting all field errors before failing.
pub fn validate_payload(payload: &DevicePayload) -> DeviceResult<NewDevice> {
    let mut errors = FieldErrors::new();

    let name = required_text("name", payload.name.as_ref(), &mut errors);
    let location = required_text("location", payload.location.as_ref(), &mut errors);
    let ip_address = validate_ip_field(payload.ip_address.as_ref(), &mut errors);
    let device_type = validate_type_field(payload.device_type.as_ref(), &mut errors);

    match (name, ip_address, device_type, location) {
        (Some(name), Some(ip_address), Some(device_type), Some(location)) if errors.is_empty() => {
            Ok(NewDevice {
                name,
                ip_address,
                device_type,
                location,
            })
        }
        _ => Err(DeviceError::invalid(errors)),
    }
}

fn required_message(field: &str) -> String {
    format!("{} is required", field)
}

fn required_text(field: &str, value: Option<&Value>, errors: &mut FieldErrors) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.insert(field.to_string(), required_message(field));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.insert(field.to_string(), required_message(field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.insert(field.to_string(), format!("{} must be a string", field));
            None
        }
    }
}

fn validate_ip_field(value: Option<&Value>, errors: &mut FieldErrors) -> Option<String> {
    const FIELD: &str = "ip_address";
    match value {
        None => {
            errors.insert(FIELD.to_string(), required_message(FIELD));
            None
        }
        Some(Value::String(s)) if is_valid_ip(s) => Some(s.clone()),
        Some(_) => {
            errors.insert(FIELD.to_string(), "Invalid IP address".to_string());
            None
        }
    }
}

fn validate_type_field(value: Option<&Value>, errors: &mut FieldErrors) -> Option<DeviceType> {
    const FIELD: &str = "type";
    match value {
        None => {
            errors.insert(FIELD.to_string(), required_message(FIELD));
            None
        }
        Some(Value::String(s)) => match s.parse::<DeviceType>() {
            Ok(device_type) => Some(device_type),
            Err(_) => {
                errors.insert(FIELD.to_string(), allowed_types_message());
                None
            }
        },
        Some(_) => {
            errors.insert(FIELD.to_string(), allowed_types_message());
            None
        }
    }
}

fn allowed_types_message() -> String {
    let names: Vec<&str> = DeviceType::ALL.iter().map(DeviceType::as_str).collect();
    format!("type must be one of [{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details_of(err: DeviceError) -> FieldErrors {
        match err {
            DeviceError::Validation { details, .. } => details,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("192.168.1.10"));
        assert!(is_valid_ip("::1"));
        assert!(is_valid_ip("fe80::1ff:fe23:4567:890a"));
        assert!(!is_valid_ip("256.1.1.1"));
        assert!(!is_valid_ip("10.0.0"));
        assert!(!is_valid_ip("router.local"));
        assert!(!is_valid_ip(""));
    }

    #[test]
    fn test_valid_payload() {
        let payload = DevicePayload::new("edge-1", "10.0.0.1", "router", "dc-east");
        let device = validate_payload(&payload).unwrap();
        assert_eq!(device.name, "edge-1");
        assert_eq!(device.ip_address, "10.0.0.1");
        assert_eq!(device.device_type, DeviceType::Router);
        assert_eq!(device.location, "dc-east");
    }

    #[test]
    fn test_empty_payload_reports_every_field() {
        let details = details_of(validate_payload(&DevicePayload::default()).unwrap_err());
        assert_eq!(details.len(), 4);
        assert_eq!(details["name"], "name is required");
        assert_eq!(details["ip_address"], "ip_address is required");
        assert_eq!(details["type"], "type is required");
        assert_eq!(details["location"], "location is required");
    }

    #[test]
    fn test_malformed_ip_rejected() {
        let payload = DevicePayload::new("edge-1", "10.0.0.300", "router", "dc-east");
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Invalid request");
        let details = details_of(err);
        assert_eq!(details.len(), 1);
        assert_eq!(details["ip_address"], "Invalid IP address");
    }

    #[test]
    fn test_present_but_empty_ip_is_invalid_not_missing() {
        let payload = DevicePayload::new("edge-1", "", "router", "dc-east");
        let details = details_of(validate_payload(&payload).unwrap_err());
        assert_eq!(details["ip_address"], "Invalid IP address");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let payload = DevicePayload::new("fw", "10.0.0.1", "firewall", "dc-east");
        let details = details_of(validate_payload(&payload).unwrap_err());
        assert_eq!(
            details["type"],
            "type must be one of [router, switch, server, other]"
        );
    }

    #[test]
    fn test_non_string_fields() {
        let payload: DevicePayload = serde_json::from_value(json!({
            "name": 42,
            "ip_address": 10,
            "type": ["router"],
            "location": null
        }))
        .unwrap();
        let details = details_of(validate_payload(&payload).unwrap_err());
        assert_eq!(details["name"], "name must be a string");
        assert_eq!(details["ip_address"], "Invalid IP address");
        assert!(details["type"].starts_with("type must be one of"));
        assert_eq!(details["location"], "location is required");
    }
}
