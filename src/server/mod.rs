//! HTTP server components for net-sentry
//!
//! This module provides the HTTP server infrastructure including:
//! - Router configuration and route handlers
//! - The WebSocket alert delivery endpoint
//! - Server lifecycle management

pub mod assets;
pub mod router;
pub mod ws;

pub use router::{build_router, AppState, StatusResponse};

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;

/// HTTP server for net-sentry
///
/// Manages the axum server lifecycle, including:
/// - Binding to the configured address
/// - Applying middleware layers
/// - Graceful shutdown handling
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        )
    }

    /// Run the server until the shutdown future resolves
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_addr();
        let app = build_router(self.state);

        // Viewers may be served from a different origin than the monitor.
        let app = app
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    /// Failed to serve requests
    #[error("Server error: {0}")]
    Serve(String),
}
