//! Port-specific error types.
//!
//! Defines error types for the raw serial link, separate from driver-level
//! errors to maintain clean separation of concerns.

use thiserror::Error;

/// Errors that can occur on the raw serial link.
#[derive(Debug, Error)]
pub enum PortError {
    /// The device node could not be opened because it does not exist.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// Another process already holds the exclusive advisory lock.
    #[error("Serial port is locked by another process: {0}")]
    Locked(String),

    /// The requested baud rate has no entry in the supported table.
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaud(u32),

    /// Raw-mode configuration was rejected by the OS.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation invoked on a handle whose link is already closed or absent.
    #[error("Port is closed (no device connected)")]
    Closed,

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port path.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a Locked error from a port path.
    pub fn locked(path: impl Into<String>) -> Self {
        Self::Locked(path.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
