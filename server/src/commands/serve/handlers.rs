//! # DeviceHub HTTP Handlers
//!
//! File: server/src/commands/serve/handlers.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Axum handlers for the `/api` routes. Each handler takes the shared
//! `AppState`, performs one inventory operation under the lock and maps the
//! outcome to a JSON response. Errors become `ApiError`, which renders the
//! `{code, message, details?}` body:
//!
//! | Error                        | Status |
//! |------------------------------|--------|
//! | `DeviceError::Validation`    | 400    |
//! | `DeviceError::NotFound`      | 404    |
//! | anything else                | 500    |
//!
//! Request bodies are read as raw bytes and parsed leniently (see
//! `DevicePayload::from_json_bytes`) so a missing or malformed body yields a
//! validation error instead of an extractor rejection.
//!
use crate::common::inventory::{Device, DevicePayload, Inventory, ListFilter, StatusReport};
use crate::core::error::{DeviceError, FieldErrors};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "device-backend";

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub inventory: Arc<RwLock<Inventory>>,
}

impl AppState {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory: Arc::new(RwLock::new(inventory)),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    Device(DeviceError),
    RouteNotFound,
    MethodNotAllowed,
}

impl From<DeviceError> for ApiError {
    fn from(err: DeviceError) -> Self {
        ApiError::Device(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::Device(DeviceError::Validation { message, details }) => {
                warn!("Rejected request: {} {:?}", message, details);
                (StatusCode::BAD_REQUEST, message, Some(details))
            }
            ApiError::Device(DeviceError::NotFound { id }) => {
                warn!("Device not found: {}", id);
                (StatusCode::NOT_FOUND, "Device not found".to_string(), None)
            }
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "Not found".to_string(), None),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
                None,
            ),
            ApiError::Device(other) => {
                error!("Unhandled error while serving request: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            code: status.as_u16(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub time: String,
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true),
    })
}

/// `GET /api/devices?type=&status=&sort=`
///
/// The query is read as raw pairs so a repeated key keeps its first value
/// instead of rejecting the request.
pub async fn list_devices(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Device>> {
    let filter = ListFilter::from_query_pairs(pairs);
    let inventory = state.inventory.read().await;
    Json(inventory.list(&filter))
}

/// `POST /api/devices`
pub async fn create_device(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Device>)> {
    let payload = DevicePayload::from_json_bytes(&body);
    let device = state.inventory.write().await.create(&payload)?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// `GET /api/devices/{id}`
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Device>> {
    let device = state.inventory.read().await.get(&id)?;
    Ok(Json(device))
}

/// `PUT /api/devices/{id}`
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Device>> {
    let payload = DevicePayload::from_json_bytes(&body);
    let device = state.inventory.write().await.update(&id, &payload)?;
    Ok(Json(device))
}

/// `DELETE /api/devices/{id}`
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.inventory.write().await.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/devices/status`
pub async fn all_statuses(State(state): State<AppState>) -> Json<Vec<StatusReport>> {
    Json(state.inventory.write().await.all_statuses())
}

/// `POST /api/devices/{id}/status`
pub async fn check_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusReport>> {
    let report = state.inventory.write().await.check_status(&id)?;
    Ok(Json(report))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Fallback for known routes called with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(health) = health().await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.service, SERVICE_NAME);
        assert!(chrono::DateTime::parse_from_rfc3339(&health.time).is_ok());
        assert!(health.time.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let response = ApiError::from(DeviceError::duplicate_ip()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Duplicate IP address");
        assert_eq!(body["details"]["ip_address"], "Duplicate");
    }

    #[tokio::test]
    async fn test_not_found_error_response_has_no_details() {
        let response = ApiError::from(DeviceError::not_found("x")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Device not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_method_not_allowed_response() {
        let response = method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["code"], 405);
        assert_eq!(body["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_other_errors_are_generic_500() {
        let response = ApiError::from(DeviceError::Config("secret detail".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], 500);
        assert_eq!(body["message"], "Internal server error");
    }
}
