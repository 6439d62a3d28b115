//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use net_sentry::blocklist::Blocklist;
use net_sentry::capture::PacketSource;
use net_sentry::classify::subnet::SubnetFilter;
use net_sentry::classify::RiskClassifier;
use net_sentry::error::CaptureError;
use net_sentry::hub::{AlertHub, Subscription};
use net_sentry::models::{Alert, Packet};
use net_sentry::server::AppState;

/// Default monitored range used throughout the integration suites
pub const TEST_SUBNET: &str = "192.168.42.0/24";

/// A packet source that replays a scripted packet list and exits
pub struct ScriptedSource {
    packets: Vec<Packet>,
}

impl ScriptedSource {
    pub fn new(packets: Vec<Packet>) -> Self {
        Self { packets }
    }
}

impl PacketSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted0"
    }

    fn run(
        &mut self,
        _shutdown: &AtomicBool,
        handler: &mut dyn FnMut(Packet),
    ) -> Result<(), CaptureError> {
        for packet in self.packets.drain(..) {
            handler(packet);
        }
        Ok(())
    }
}

/// Build a classifier over the test subnet and the given blocklist entries
pub fn create_test_classifier(
    blocklist_entries: &[&str],
    reputation_enabled: bool,
) -> Arc<RiskClassifier> {
    let filter = SubnetFilter::new(TEST_SUBNET).expect("test subnet should parse");
    let blocklist = Arc::new(Blocklist::from_entries(
        blocklist_entries.iter().copied().map(str::to_string),
    ));
    Arc::new(RiskClassifier::new(filter, blocklist, reputation_enabled))
}

/// Build application state around a fresh hub
pub fn create_test_state(blocklist_entries: &[&str]) -> AppState {
    AppState {
        hub: Arc::new(AlertHub::new()),
        blocklist: Arc::new(Blocklist::from_entries(
            blocklist_entries.iter().copied().map(str::to_string),
        )),
        interface: "usb0".to_string(),
    }
}

/// Receive and decode the next alert frame, with a generous timeout
pub async fn next_alert(subscription: &mut Subscription) -> Alert {
    let frame = tokio::time::timeout(Duration::from_secs(5), subscription.frames.recv())
        .await
        .expect("timed out waiting for alert")
        .expect("hub dropped subscriber");
    serde_json::from_str(&frame).expect("alert frame should be valid JSON")
}

/// Assert that no further frame arrives within a short window
pub async fn assert_no_alert(subscription: &mut Subscription) {
    let next = tokio::time::timeout(Duration::from_millis(200), subscription.frames.recv()).await;
    assert!(next.is_err(), "unexpected alert frame: {:?}", next);
}
