//! HTTP router for net-sentry
//!
//! This module defines the axum router that handles all HTTP requests:
//! - `/` serves the embedded viewer page
//! - `/ws` upgrades to the alert WebSocket stream
//! - `/status` reports the monitor's runtime state

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::blocklist::Blocklist;
use crate::hub::AlertHub;

use super::assets;
use super::ws::ws_handler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Alert broadcast hub
    pub hub: Arc<AlertHub>,

    /// Loaded blocklist (read-only after startup)
    pub blocklist: Arc<Blocklist>,

    /// Name of the monitored capture interface
    pub interface: String,
}

/// Status endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub monitoring_interface: String,
    pub connected_clients: usize,
    pub blocklist_size: usize,
}

/// Build the main application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ws", get(ws_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Viewer page handler
async fn index_handler() -> impl IntoResponse {
    assets::serve_index()
}

/// Status endpoint handler
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "running".to_string(),
        monitoring_interface: state.interface.clone(),
        connected_clients: state.hub.client_count().await,
        blocklist_size: state.blocklist.len(),
    })
}
