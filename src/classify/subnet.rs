//! Monitored-device subnet filter
//!
//! A conservative pass/no-pass predicate over IP address strings: an address
//! passes only if it parses and falls inside the configured CIDR range.
//! Malformed input returns false rather than erroring, so the filter never
//! raises to its caller.

use std::net::IpAddr;

use ipnetwork::IpNetwork;

use crate::config::ConfigError;
use crate::models::Packet;

/// Predicate deciding whether an address belongs to the monitored device's
/// network range.
#[derive(Debug, Clone, Copy)]
pub struct SubnetFilter {
    network: IpNetwork,
}

impl SubnetFilter {
    /// Build a filter from a CIDR string such as `192.168.42.0/24`
    pub fn new(cidr: &str) -> Result<Self, ConfigError> {
        let network = cidr
            .parse::<IpNetwork>()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid subnet '{}': {}", cidr, e)))?;
        Ok(Self { network })
    }

    /// True iff the address parses as a valid IP and falls within the
    /// monitored range. Unparsable input returns false.
    pub fn matches(&self, ip: &str) -> bool {
        match ip.parse::<IpAddr>() {
            Ok(addr) => self.network.contains(addr),
            Err(_) => false,
        }
    }

    /// True iff either side of the packet belongs to the monitored device.
    ///
    /// Packets failing this check are discarded with no side effect; the
    /// filter is noise reduction, not a security decision.
    pub fn involves_monitored_device(&self, packet: &Packet) -> bool {
        self.matches(&packet.src_ip) || self.matches(&packet.dst_ip)
    }

    /// The configured CIDR range
    pub fn network(&self) -> IpNetwork {
        self.network
    }
}
