//! Unified driver error handling.
//!
//! Link-level failures live in [`crate::port::PortError`] and convert into
//! `DriverError` via `#[from]`, so `?` flows through every layer without
//! wrapping by hand.

use crate::port::PortError;
use thiserror::Error;

/// Errors surfaced by the driver above the raw link layer.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Discovery exhausted every strategy without finding the device.
    #[error("MAKCU device not found: no serial port matched any discovery strategy")]
    DeviceNotFound,

    /// The speed-switch frame was not accepted in full by the link.
    #[error("speed-switch frame truncated: wrote {written} of 9 bytes")]
    ProtocolViolation {
        /// Number of bytes the link actually accepted.
        written: usize,
    },

    /// The post-switch identity probe did not contain the expected marker.
    #[error("handshake failed: identity probe returned {response:?}")]
    HandshakeFailed {
        /// The raw probe response, lossily decoded for diagnosis.
        response: String,
    },

    /// An action helper was given malformed parameters; caught before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A query response matched none of the expected markers.
    #[error("could not parse device response: {0:?}")]
    ParseFailure(String),

    /// A link-level error occurred.
    #[error(transparent)]
    Port(#[from] PortError),
}

impl DriverError {
    /// Create an InvalidArgument error from a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Convenient Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_violation_display() {
        let err = DriverError::ProtocolViolation { written: 4 };
        assert_eq!(
            err.to_string(),
            "speed-switch frame truncated: wrote 4 of 9 bytes"
        );
    }

    #[test]
    fn test_handshake_failed_carries_response() {
        let err = DriverError::HandshakeFailed {
            response: "garbage".to_string(),
        };
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn test_port_error_passthrough() {
        let err: DriverError = PortError::Closed.into();
        assert_eq!(err.to_string(), "Port is closed (no device connected)");
    }
}
