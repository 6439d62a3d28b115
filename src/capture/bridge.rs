//! Capture-to-hub bridge
//!
//! The capture source runs a blocking loop and must never be allowed to
//! block the delivery path, and delivery to an unbounded number of
//! subscribers must never throttle packet throughput. The bridge sits on
//! that boundary:
//!
//! - the capture loop runs on its own dedicated OS thread; only the subnet
//!   filter and the classifier run there (cheap, non-blocking)
//! - classified verdicts cross into the tokio runtime over an unbounded
//!   channel, so the capture thread never waits on delivery
//! - reputation lookups run as per-request tasks on the runtime; a stuck
//!   lookup stalls only that one alert's enrichment
//!
//! Shutdown is best effort: the capture flag is honored at packet
//! boundaries, since the underlying capture API is not preemptible mid-call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::classify::reputation::{self, ReputationLookup};
use crate::classify::{RiskClassifier, ScoreRequest, Verdict};
use crate::error::CaptureError;
use crate::hub::AlertHub;
use crate::models::Alert;

use super::PacketSource;

/// Work handed from the capture thread to the delivery runtime
enum PipelineEvent {
    /// A finished alert, ready to broadcast
    Broadcast(Alert),
    /// An external address that needs asynchronous scoring
    Score(ScoreRequest),
}

/// Handle to a running capture pipeline
pub struct CaptureHandle {
    shutdown: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl CaptureHandle {
    /// Ask the capture loop to stop at the next packet boundary
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Wait for the capture thread to exit.
    ///
    /// Blocks until the source yields its next packet (or fails), so callers
    /// should `stop` first and treat this as best effort.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Start the capture pipeline.
///
/// Must be called with the blocklist already loaded and the hub already
/// accepting registrations; alerts emitted into an empty subscriber set are
/// silently dropped (there is no backlog or replay), which is acceptable but
/// must not surface as an error.
///
/// The returned handle stops the loop; the delivery task exits on its own
/// once the capture thread is gone and the channel drains.
pub fn spawn_pipeline(
    mut source: Box<dyn PacketSource>,
    classifier: Arc<RiskClassifier>,
    hub: Arc<AlertHub>,
    reputation: Option<Arc<dyn ReputationLookup>>,
) -> Result<CaptureHandle, CaptureError> {
    let (tx, rx) = mpsc::unbounded_channel::<PipelineEvent>();

    tokio::spawn(deliver_events(rx, hub, reputation));

    let shutdown = Arc::new(AtomicBool::new(false));
    let capture_shutdown = Arc::clone(&shutdown);
    let source_name = source.name().to_string();

    let thread = std::thread::Builder::new()
        .name("net-sentry-capture".to_string())
        .spawn(move || {
            let mut handler = |packet: crate::models::Packet| {
                // Hard noise filter: drop anything not involving the device.
                if !classifier.filter().involves_monitored_device(&packet) {
                    return;
                }
                match classifier.classify(&packet) {
                    Verdict::Alert(alert) => {
                        let _ = tx.send(PipelineEvent::Broadcast(alert));
                    }
                    Verdict::Score(request) => {
                        let _ = tx.send(PipelineEvent::Score(request));
                    }
                    Verdict::Clear => {}
                }
            };

            match source.run(&capture_shutdown, &mut handler) {
                Ok(()) => info!(source = %source_name, "Capture loop exited"),
                Err(e) => error!(source = %source_name, error = %e, "Capture source failed"),
            }
        })
        .map_err(|e| CaptureError::SourceFailed(format!("Failed to spawn capture thread: {}", e)))?;

    Ok(CaptureHandle {
        shutdown,
        thread: Some(thread),
    })
}

/// Drain classified verdicts on the delivery runtime.
///
/// Broadcasts are awaited in order, preserving per-subscriber alert order.
/// Score requests each get their own task so one slow lookup cannot delay
/// blocklist alerts behind it.
async fn deliver_events(
    mut rx: mpsc::UnboundedReceiver<PipelineEvent>,
    hub: Arc<AlertHub>,
    reputation: Option<Arc<dyn ReputationLookup>>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::Broadcast(alert) => {
                let delivered = hub.broadcast(&alert).await;
                debug!(
                    src = %alert.src_ip,
                    dst = %alert.dst_ip,
                    risk = alert.risk_level,
                    delivered,
                    "Alert broadcast"
                );
            }
            PipelineEvent::Score(request) => {
                let Some(lookup) = reputation.as_ref().map(Arc::clone) else {
                    continue;
                };
                let hub = Arc::clone(&hub);
                tokio::spawn(async move {
                    let (risk_level, reason) = match lookup.lookup(&request.ip).await {
                        Ok(score) => reputation::map_score(&request.ip, score),
                        Err(e) => reputation::map_failure(&request.ip, &e),
                    };
                    let alert = Alert::for_packet(&request.packet, risk_level, reason);
                    hub.broadcast(&alert).await;
                });
            }
        }
    }
}
