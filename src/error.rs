//! Shared error types for net-sentry
//!
//! Errors that cross module boundaries live here; errors local to one
//! module (`ConfigError`, `ServerError`, `LoggingError`) live with their
//! module. All error types use `thiserror`.

use thiserror::Error;

/// Packet capture errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    /// Named interface does not exist on this host
    #[error("Interface not found: {0}")]
    InterfaceNotFound(String),

    /// Datalink channel could not be opened (typically missing privileges)
    #[error("Failed to open capture channel on {interface}: {reason}")]
    ChannelOpen { interface: String, reason: String },

    /// Unsupported datalink channel type
    #[error("Unsupported channel type on interface {0}")]
    UnsupportedChannel(String),

    /// The capture source failed mid-run (e.g. interface vanished)
    #[error("Capture source failed: {0}")]
    SourceFailed(String),
}

/// Reputation lookup errors
///
/// A lookup failure never crosses into the classifier as an error: the
/// caller maps it to a risk level 0 alert with a descriptive reason.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    /// Network timeout
    #[error("Network timeout")]
    NetworkTimeout,

    /// Connection refused
    #[error("Connection refused")]
    ConnectionRefused,

    /// Non-2xx response from the reputation API
    #[error("Reputation API error: HTTP {0}")]
    ApiError(u16),

    /// Response body could not be decoded
    #[error("Invalid reputation response: {0}")]
    InvalidResponse(String),

    /// Generic network error
    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: CaptureError message formatting
    #[test]
    fn test_capture_error_messages() {
        assert_eq!(
            CaptureError::InterfaceNotFound("usb0".to_string()).to_string(),
            "Interface not found: usb0"
        );
        assert_eq!(
            CaptureError::ChannelOpen {
                interface: "usb0".to_string(),
                reason: "permission denied".to_string()
            }
            .to_string(),
            "Failed to open capture channel on usb0: permission denied"
        );
        assert_eq!(
            CaptureError::UnsupportedChannel("usb0".to_string()).to_string(),
            "Unsupported channel type on usb0"
        );
        assert_eq!(
            CaptureError::SourceFailed("interface vanished".to_string()).to_string(),
            "Capture source failed: interface vanished"
        );
    }

    // Test 2: LookupError message formatting
    #[test]
    fn test_lookup_error_messages() {
        assert_eq!(LookupError::NetworkTimeout.to_string(), "Network timeout");
        assert_eq!(
            LookupError::ApiError(503).to_string(),
            "Reputation API error: HTTP 503"
        );
        assert_eq!(
            LookupError::InvalidResponse("missing score".to_string()).to_string(),
            "Invalid reputation response: missing score"
        );
        assert_eq!(
            LookupError::Network("connection reset".to_string()).to_string(),
            "Network error: connection reset"
        );
    }
}
