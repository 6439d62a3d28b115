//! net-sentry - Live network traffic monitor with real-time risk alerts
//!
//! This is the main entry point for the net-sentry application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use net_sentry::blocklist::Blocklist;
use net_sentry::capture::bridge::spawn_pipeline;
use net_sentry::capture::PnetSource;
use net_sentry::classify::reputation::{AbuseIpdbClient, ReputationLookup};
use net_sentry::classify::subnet::SubnetFilter;
use net_sentry::classify::RiskClassifier;
use net_sentry::config::Config;
use net_sentry::hub::AlertHub;
use net_sentry::logging::init_tracing;
use net_sentry::server::{AppState, Server};

/// net-sentry - Live network traffic monitor with real-time risk alerts
#[derive(Parser, Debug)]
#[command(name = "net-sentry")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "NET_SENTRY_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Initialize tracing/logging
    init_tracing(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting net-sentry"
    );

    // Load the blocklist before anything downstream starts: the classifier
    // reads it without synchronization for the rest of the run.
    let blocklist = Arc::new(Blocklist::load(&config.blocklist.path));
    info!(entries = blocklist.len(), "Blocklist ready");

    // Build the classification pipeline
    let filter = SubnetFilter::new(&config.capture.subnet)
        .map_err(|e| anyhow::anyhow!("Invalid capture subnet: {}", e))?;
    info!(subnet = %filter.network(), "Monitoring device subnet");

    let reputation: Option<Arc<dyn ReputationLookup>> =
        match AbuseIpdbClient::from_config(&config.reputation) {
            Some(client) => {
                info!(endpoint = %config.reputation.endpoint, "Reputation lookups enabled");
                Some(Arc::new(client))
            }
            None => {
                if config.reputation.enabled {
                    warn!("Reputation enabled but no API key configured, lookups disabled");
                }
                None
            }
        };

    let classifier = Arc::new(RiskClassifier::new(
        filter,
        Arc::clone(&blocklist),
        reputation.is_some(),
    ));

    // The hub must be ready to accept registrations before the capture loop
    // begins emitting classified alerts.
    let hub = Arc::new(AlertHub::new());

    // A capture failure at startup is fatal: there is nothing to monitor.
    let source = PnetSource::new(&config.capture.interface)?;
    let capture = spawn_pipeline(Box::new(source), classifier, Arc::clone(&hub), reputation)?;
    info!(interface = %config.capture.interface, "Capture pipeline started");

    // Create application state
    let state = AppState {
        hub,
        blocklist,
        interface: config.capture.interface.clone(),
    };

    // Create and start the HTTP server
    let server = Server::new(config.server.clone(), state);
    let shutdown_signal = shutdown_signal();

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    let result = server.run(shutdown_signal).await;

    // Best effort: the capture loop exits at the next packet boundary.
    capture.stop();

    info!("net-sentry shutdown complete");

    result.map_err(Into::into)
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
