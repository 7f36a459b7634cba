//! Driver configuration.
//!
//! A plain in-memory configuration struct with defaults; the driver does
//! not persist configuration across runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to and talking with the device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Baud rate for the initial connection, before renegotiation.
    pub initial_baud: u32,

    /// Hardware read timeout in milliseconds.
    pub read_timeout_ms: u64,

    /// Emit debug-level diagnostics (raw payloads of every write).
    pub verbose: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            initial_baud: 115_200,
            read_timeout_ms: 500,
            verbose: false,
        }
    }
}

impl DriverConfig {
    /// Get the read timeout as a Duration.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.initial_baud, 115_200);
        assert_eq!(config.read_timeout(), Duration::from_millis(500));
        assert!(!config.verbose);
    }
}
