//! Alert broadcast hub
//!
//! The hub owns the live set of subscriber connections and fans each alert
//! out to all of them. It is the single authority on subscriber membership:
//! a subscriber leaves either by explicit disconnect (`unregister`) or by
//! failing a delivery, in which case the hub removes it itself.
//!
//! Each subscriber gets its own unbounded queue of pre-serialized frames,
//! which gives two guarantees cheaply: alerts reach any one subscriber in
//! `broadcast` call order, and a slow subscriber never blocks a producer or
//! its peers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::models::Alert;

/// Identifier the hub assigns to a registered subscriber
pub type SubscriberId = u64;

/// A registered subscriber's receiving end.
///
/// The first frame received is always the sentinel alert; dropping the
/// subscription causes the hub to remove the subscriber at the next
/// broadcast that fails to deliver.
pub struct Subscription {
    /// Hub-assigned identifier, used for explicit unregistration
    pub id: SubscriberId,
    /// Ordered stream of serialized alert frames
    pub frames: mpsc::UnboundedReceiver<String>,
}

/// Maintains the subscriber set and fans out alerts.
pub struct AlertHub {
    subscribers: RwLock<HashMap<SubscriberId, mpsc::UnboundedSender<String>>>,
    next_id: AtomicU64,
}

impl AlertHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add a subscriber to the live set.
    ///
    /// The sentinel alert is queued before the subscriber becomes visible to
    /// broadcasts, so it is always the first frame delivered, even when
    /// registrations race with in-flight broadcasts.
    pub async fn register(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        match serde_json::to_string(&Alert::sentinel()) {
            Ok(frame) => {
                // Queue is private until the map insert below, so this
                // cannot be reordered behind a broadcast.
                let _ = tx.send(frame);
            }
            Err(e) => error!(error = %e, "Failed to serialize sentinel alert"),
        }

        self.subscribers.write().await.insert(id, tx);
        debug!(subscriber = id, "Subscriber registered");

        Subscription { id, frames: rx }
    }

    /// Remove a subscriber from the live set.
    ///
    /// Idempotent: removing an already-absent subscriber is a no-op.
    pub async fn unregister(&self, id: SubscriberId) {
        if self.subscribers.write().await.remove(&id).is_some() {
            debug!(subscriber = id, "Subscriber unregistered");
        }
    }

    /// Deliver an alert to every currently-registered subscriber.
    ///
    /// The alert is serialized once; delivery is attempted against a
    /// point-in-time snapshot of the set. A failed delivery removes that
    /// subscriber and never affects the rest. Returns the number of
    /// subscribers the alert was queued for.
    pub async fn broadcast(&self, alert: &Alert) -> usize {
        let frame = match serde_json::to_string(alert) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "Failed to serialize alert, dropping broadcast");
                return 0;
            }
        };

        let mut failed: Vec<SubscriberId> = Vec::new();
        let mut delivered = 0;
        {
            let subscribers = self.subscribers.read().await;
            for (&id, tx) in subscribers.iter() {
                if tx.send(frame.clone()).is_ok() {
                    delivered += 1;
                } else {
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in failed {
                if subscribers.remove(&id).is_some() {
                    warn!(subscriber = id, "Removed subscriber after failed delivery");
                }
            }
        }

        delivered
    }

    /// Number of currently-registered subscribers
    pub async fn client_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

impl Default for AlertHub {
    fn default() -> Self {
        Self::new()
    }
}
