//! Data model for net-sentry
//!
//! This module defines the types that flow through the monitoring pipeline:
//! observed packets, reputation scores, and the alerts delivered to viewers.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format used on the wire, matching what the viewer renders.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Address used on both sides of the sentinel alert sent at registration.
pub const SENTINEL_ADDR: &str = "0.0.0.0";

/// IP protocol marker extracted from the packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    /// Any other IP protocol, carrying the raw protocol number
    Other(u8),
}

impl Protocol {
    /// Map an IP next-level-protocol number to a marker
    pub fn from_ip_number(number: u8) -> Self {
        match number {
            1 | 58 => Protocol::Icmp,
            6 => Protocol::Tcp,
            17 => Protocol::Udp,
            other => Protocol::Other(other),
        }
    }
}

/// A single observed IP packet, produced by the capture source.
///
/// Packets are ephemeral: they are classified and dropped, never retained.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Source address as printed from the IP header
    pub src_ip: String,
    /// Destination address as printed from the IP header
    pub dst_ip: String,
    /// Protocol marker from the IP header
    pub protocol: Protocol,
    /// Observation time, already formatted for the wire
    pub timestamp: String,
}

impl Packet {
    /// Create a packet observed now
    pub fn observed_now(
        src_ip: impl Into<String>,
        dst_ip: impl Into<String>,
        protocol: Protocol,
    ) -> Self {
        Self {
            src_ip: src_ip.into(),
            dst_ip: dst_ip.into(),
            protocol,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// A risk alert delivered to every live viewer.
///
/// Immutable once constructed; the hub serializes it once per broadcast and
/// copies the serialized form to each subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub src_ip: String,
    pub dst_ip: String,
    pub timestamp: String,
    /// 0-10, where 8+ is a high-confidence signal
    pub risk_level: u8,
    pub reason: String,
}

impl Alert {
    /// Build an alert for a classified packet
    pub fn for_packet(packet: &Packet, risk_level: u8, reason: impl Into<String>) -> Self {
        Self {
            src_ip: packet.src_ip.clone(),
            dst_ip: packet.dst_ip.clone(),
            timestamp: packet.timestamp.clone(),
            risk_level,
            reason: reason.into(),
        }
    }

    /// The synthetic alert sent to a subscriber right after registration.
    ///
    /// Viewers use it to confirm liveness; `is_sentinel` lets consumers
    /// exclude it from alert counts.
    pub fn sentinel() -> Self {
        Self {
            src_ip: SENTINEL_ADDR.to_string(),
            dst_ip: SENTINEL_ADDR.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            risk_level: 0,
            reason: "Connected to net-sentry traffic monitor".to_string(),
        }
    }

    /// True for the registration sentinel
    pub fn is_sentinel(&self) -> bool {
        self.src_ip == SENTINEL_ADDR && self.dst_ip == SENTINEL_ADDR
    }
}
