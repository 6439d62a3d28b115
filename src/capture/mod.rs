//! Packet capture sources
//!
//! A [`PacketSource`] produces a sequence of observed IP packets until told
//! to stop. The production implementation reads a pnet datalink channel on a
//! named interface; tests substitute scripted sources.
//!
//! Capture is blocking by nature: a source runs a synchronous loop and must
//! be driven from its own dedicated thread (see [`bridge`]).

pub mod bridge;

use std::sync::atomic::{AtomicBool, Ordering};

use pnet::datalink::{self, Channel, NetworkInterface};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::Packet as PnetPacket;
use tracing::info;

use crate::error::CaptureError;
use crate::models::{Packet, Protocol};

/// Capability: produce observed IP packets until cancelled.
///
/// `run` blocks until the shutdown flag is set or the source fails.
/// Cancellation is best effort: underlying capture APIs are not cleanly
/// preemptible mid-call, so the flag is honored at packet boundaries.
pub trait PacketSource: Send {
    /// Name of the interface (or source) being observed
    fn name(&self) -> &str;

    /// Run the blocking capture loop, invoking `handler` once per IP packet
    fn run(
        &mut self,
        shutdown: &AtomicBool,
        handler: &mut dyn FnMut(Packet),
    ) -> Result<(), CaptureError>;
}

/// Packet source backed by a pnet datalink channel
pub struct PnetSource {
    interface: NetworkInterface,
}

impl PnetSource {
    /// Resolve the named interface; fails when it does not exist.
    pub fn new(interface_name: &str) -> Result<Self, CaptureError> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == interface_name)
            .ok_or_else(|| CaptureError::InterfaceNotFound(interface_name.to_string()))?;
        Ok(Self { interface })
    }
}

impl PacketSource for PnetSource {
    fn name(&self) -> &str {
        &self.interface.name
    }

    fn run(
        &mut self,
        shutdown: &AtomicBool,
        handler: &mut dyn FnMut(Packet),
    ) -> Result<(), CaptureError> {
        let channel = datalink::channel(&self.interface, Default::default()).map_err(|e| {
            CaptureError::ChannelOpen {
                interface: self.interface.name.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut rx = match channel {
            Channel::Ethernet(_, rx) => rx,
            _ => return Err(CaptureError::UnsupportedChannel(self.interface.name.clone())),
        };

        info!(interface = %self.interface.name, "Started packet capture");

        while !shutdown.load(Ordering::Acquire) {
            match rx.next() {
                Ok(frame) => {
                    if let Some(packet) = parse_ip_packet(frame) {
                        handler(packet);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(CaptureError::SourceFailed(e.to_string())),
            }
        }

        info!(interface = %self.interface.name, "Packet capture stopped");
        Ok(())
    }
}

/// Extract the IP header fields from an Ethernet frame.
///
/// Non-IP frames return None; protocol decoding beyond the IP header is out
/// of scope.
fn parse_ip_packet(frame: &[u8]) -> Option<Packet> {
    let ethernet = EthernetPacket::new(frame)?;
    match ethernet.get_ethertype() {
        EtherTypes::Ipv4 => {
            let ip = Ipv4Packet::new(ethernet.payload())?;
            Some(Packet::observed_now(
                ip.get_source().to_string(),
                ip.get_destination().to_string(),
                Protocol::from_ip_number(ip.get_next_level_protocol().0),
            ))
        }
        EtherTypes::Ipv6 => {
            let ip = Ipv6Packet::new(ethernet.payload())?;
            Some(Packet::observed_now(
                ip.get_source().to_string(),
                ip.get_destination().to_string(),
                Protocol::from_ip_number(ip.get_next_header().0),
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Unknown interface is rejected at construction
    #[test]
    fn test_unknown_interface_rejected() {
        let result = PnetSource::new("definitely-not-a-real-interface-xyz");
        match result {
            Err(CaptureError::InterfaceNotFound(name)) => {
                assert_eq!(name, "definitely-not-a-real-interface-xyz");
            }
            _ => panic!("Expected CaptureError::InterfaceNotFound"),
        }
    }

    // Test 2: Truncated frames parse to None rather than panicking
    #[test]
    fn test_truncated_frame_is_ignored() {
        assert!(parse_ip_packet(&[]).is_none());
        assert!(parse_ip_packet(&[0x00, 0x01, 0x02]).is_none());
    }

    // Test 3: A minimal IPv4 frame parses into the expected packet
    #[test]
    fn test_parse_ipv4_frame() {
        // Ethernet header: dst mac, src mac, ethertype 0x0800 (IPv4)
        let mut frame = vec![
            0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, // dst
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, // src
            0x08, 0x00, // IPv4
        ];
        // IPv4 header: version/IHL, TOS, total length, id, flags/frag,
        // TTL, protocol 6 (TCP), checksum, src 192.168.42.5, dst 10.0.0.50
        frame.extend_from_slice(&[
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, 0x06, 0x00, 0x00,
            192, 168, 42, 5, //
            10, 0, 0, 50,
        ]);

        let packet = parse_ip_packet(&frame).expect("frame should parse");
        assert_eq!(packet.src_ip, "192.168.42.5");
        assert_eq!(packet.dst_ip, "10.0.0.50");
        assert_eq!(packet.protocol, Protocol::Tcp);
    }

    // Test 4: Non-IP ethertypes are filtered out
    #[test]
    fn test_non_ip_frame_is_ignored() {
        // ARP ethertype 0x0806
        let frame = vec![
            0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, //
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, //
            0x08, 0x06, //
            0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01,
        ];
        assert!(parse_ip_packet(&frame).is_none());
    }
}
