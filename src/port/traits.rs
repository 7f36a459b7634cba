//! Core trait for serial link abstraction.
//!
//! Defines the `SerialLink` trait that allows both the real tty-backed link
//! and mock implementations to be used interchangeably.

use super::error::PortError;

/// The set of baud rates the device side of the link can be driven at.
///
/// These mirror the discrete speed constants exposed by the OS line
/// discipline; arbitrary values between entries are rejected before any
/// open attempt is made.
pub const SUPPORTED_BAUDS: &[u32] = &[
    9_600, 19_200, 38_400, 57_600, 115_200, 230_400, 460_800, 500_000, 576_000, 921_600,
    1_000_000, 1_152_000, 1_500_000, 2_000_000, 2_500_000, 3_000_000, 3_500_000, 4_000_000,
];

/// Check whether a baud rate has an entry in the supported table.
pub fn is_supported_baud(baud: u32) -> bool {
    SUPPORTED_BAUDS.contains(&baud)
}

/// Trait for byte-level serial link operations.
///
/// This trait abstracts over synchronous serial I/O, allowing both real
/// hardware links and mock implementations for testing.
pub trait SerialLink: Send + std::fmt::Debug {
    /// Write bytes to the link.
    ///
    /// Returns the number of bytes actually accepted by the OS.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes from the link into the provided buffer.
    ///
    /// Returns the number of bytes actually read. A read may come back
    /// short once the hardware timeout expires.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Block until the OS has transmitted every queued output byte.
    fn drain(&mut self) -> Result<(), PortError>;

    /// Discard any unread input and any unsent output.
    fn clear_buffers(&mut self) -> Result<(), PortError>;

    /// Get the path/name of this link's device node.
    fn name(&self) -> &str;

    /// Get the baud rate the link was configured at.
    fn baud_rate(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_baud_table() {
        assert_eq!(SUPPORTED_BAUDS.len(), 18);
        assert!(is_supported_baud(9_600));
        assert!(is_supported_baud(115_200));
        assert!(is_supported_baud(4_000_000));
    }

    #[test]
    fn test_unsupported_bauds_rejected() {
        assert!(!is_supported_baud(0));
        assert!(!is_supported_baud(12_345));
        assert!(!is_supported_baud(128_000));
        assert!(!is_supported_baud(8_000_000));
    }
}
