//! # DeviceHub HTTP Server Implementation
//!
//! File: server/src/commands/serve/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Wires the inventory handlers into an Axum router and runs it until a
//! shutdown signal arrives.
//!
//! ## Architecture
//!
//! 1. Build `AppState` around a fresh `Inventory` using the configured status TTL
//! 2. Create the router (`create_app`): `/api` routes, JSON 404/405 fallbacks, request tracing
//! 3. Bind a `TcpListener` to the configured address
//! 4. Serve with graceful shutdown on Ctrl+C / SIGTERM
//!
//! ## Routes
//!
//! - `GET    /api/health`
//! - `GET    /api/devices`, `POST /api/devices`
//! - `GET    /api/devices/status`
//! - `GET    /api/devices/{id}`, `PUT /api/devices/{id}`, `DELETE /api/devices/{id}`
//! - `POST   /api/devices/{id}/status`
//!
use super::config::ServerConfig;
use super::handlers::{self, AppState};
use crate::common::inventory::Inventory;
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

/// # Run HTTP Server (`run_server`)
///
/// Binds to `config.host:config.port` and serves the API until shutdown.
///
/// ## Errors
///
/// Returns an error if the listener cannot be bound (port in use, permissions)
/// or the server fails while running.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let state = AppState::new(Inventory::new(config.status_ttl));
    let app = create_app(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    println!("\n=================================================================");
    println!("🌐 DeviceHub API listening on: http://{}/api", addr);
    println!("⏱️  Status cache TTL:          {}s", config.status_ttl.as_secs());
    println!("=================================================================\n");
    info!("Starting server on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutdown complete.");
    Ok(())
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router with every `/api` route, JSON fallbacks for unknown
/// routes and unsupported methods, and the HTTP tracing layer.
pub fn create_app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/devices",
            get(handlers::list_devices).post(handlers::create_device),
        )
        .route("/devices/status", get(handlers::all_statuses))
        .route(
            "/devices/{id}",
            get(handlers::get_device)
                .put(handlers::update_device)
                .delete(handlers::delete_device),
        )
        .route("/devices/{id}/status", post(handlers::check_status))
        .method_not_allowed_fallback(handlers::method_not_allowed);

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace_layer))
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves when Ctrl+C or (on Unix) SIGTERM is received. If a handler cannot
/// be installed, that branch never resolves and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// --- Unit Tests ---
