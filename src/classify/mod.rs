//! Risk classification of observed packets
//!
//! This module contains the pieces that decide whether an observed flow
//! warrants an alert:
//!
//! - [`subnet`]: the monitored-device CIDR filter
//! - [`reputation`]: the third-party abuse-score lookup capability
//! - [`RiskClassifier`]: blocklist matching with reputation as a fallback
//!   signal
//!
//! Classification runs on the capture thread and must stay cheap: the
//! common no-signal case performs only set lookups, no allocation.

pub mod reputation;
pub mod subnet;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use crate::blocklist::Blocklist;
use crate::models::{Alert, Packet};
use reputation::BLOCKLIST_RISK_LEVEL;
use subnet::SubnetFilter;

/// A request to score an external address, handed to the delivery side when
/// no blocklist signal fired but reputation lookups are enabled.
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    /// The external address to score
    pub ip: String,
    /// The packet that triggered the request
    pub packet: Packet,
}

/// Outcome of classifying one packet
#[derive(Debug, Clone)]
pub enum Verdict {
    /// A blocklist hit; broadcast immediately
    Alert(Alert),
    /// No blocklist hit; the external side should be scored asynchronously
    Score(ScoreRequest),
    /// No signal fired; the common case
    Clear,
}

/// Classifies packets already known to involve the monitored device.
///
/// The blocklist hit is checked first and takes precedence: it is a
/// higher-confidence signal than a third-party score. Reputation is
/// consulted at most once per external address per run.
pub struct RiskClassifier {
    filter: SubnetFilter,
    blocklist: Arc<Blocklist>,
    reputation_enabled: bool,
    /// External addresses already submitted for scoring this run.
    /// Only the capture thread touches this; the mutex exists so the
    /// classifier stays Sync for test harnesses and future producers.
    scored: Mutex<HashSet<String>>,
}

impl RiskClassifier {
    /// Create a classifier over the given filter and blocklist
    pub fn new(filter: SubnetFilter, blocklist: Arc<Blocklist>, reputation_enabled: bool) -> Self {
        Self {
            filter,
            blocklist,
            reputation_enabled,
            scored: Mutex::new(HashSet::new()),
        }
    }

    /// The subnet filter this classifier was built with
    pub fn filter(&self) -> &SubnetFilter {
        &self.filter
    }

    /// Classify one packet.
    ///
    /// The caller has already established that the packet involves the
    /// monitored device; this only decides whether a signal fires.
    pub fn classify(&self, packet: &Packet) -> Verdict {
        // Blocklist first: fixed high severity, names the matched address.
        if let Some(suspicious_ip) = self.blocklist_match(packet) {
            let alert = Alert::for_packet(
                packet,
                BLOCKLIST_RISK_LEVEL,
                format!("IP {} found in blocklist", suspicious_ip),
            );
            return Verdict::Alert(alert);
        }

        if self.reputation_enabled {
            if let Some(external_ip) = self.external_side(packet) {
                let mut scored = self.scored.lock().expect("scored set poisoned");
                if scored.insert(external_ip.to_string()) {
                    return Verdict::Score(ScoreRequest {
                        ip: external_ip.to_string(),
                        packet: packet.clone(),
                    });
                }
            }
        }

        Verdict::Clear
    }

    /// The blocklisted side of the packet, if any. Source wins when both
    /// sides match.
    fn blocklist_match<'a>(&self, packet: &'a Packet) -> Option<&'a str> {
        if self.blocklist.contains(&packet.src_ip) {
            Some(&packet.src_ip)
        } else if self.blocklist.contains(&packet.dst_ip) {
            Some(&packet.dst_ip)
        } else {
            None
        }
    }

    /// The side of the packet outside the monitored subnet, if any
    fn external_side<'a>(&self, packet: &'a Packet) -> Option<&'a str> {
        if !self.filter.matches(&packet.src_ip) {
            Some(&packet.src_ip)
        } else if !self.filter.matches(&packet.dst_ip) {
            Some(&packet.dst_ip)
        } else {
            None
        }
    }
}
