//! Device handle: the single owner of one open, configured connection.
//!
//! A `DeviceHandle` pairs the resolved device path with the raw link and the
//! baud rate the link was configured at. The link is held in an `Option` so
//! that closing takes it out exactly once; any later operation on the handle
//! reports [`PortError::Closed`] instead of touching a dead resource.

use crate::port::{PortError, SerialLink};
use tracing::{debug, info};

#[cfg(unix)]
use crate::config::DriverConfig;
#[cfg(unix)]
use crate::discovery::DeviceLocator;
#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use crate::port::TtyLink;

/// An open connection to the MAKCU.
///
/// Exclusively owned by the caller that created it; the driver keeps no
/// other reference. The handle is not internally synchronized: a caller
/// needing concurrent access must serialize operations itself.
#[derive(Debug)]
pub struct DeviceHandle {
    /// Resolved device node path.
    path: String,
    /// Baud rate the link is configured at.
    baud: u32,
    /// The raw link; `None` once closed.
    link: Option<Box<dyn SerialLink>>,
}

impl DeviceHandle {
    /// Open a connection to the device at the given path and baud rate.
    ///
    /// On success the underlying resource is in raw mode (8 data bits, no
    /// parity, no flow control, 0.5 s read timeout), exclusively locked,
    /// and flushed of stale buffered data.
    #[cfg(unix)]
    pub fn connect(path: &str, baud: u32) -> Result<Self, PortError> {
        let link = TtyLink::open(path, baud)?;
        info!("Connected to MAKCU at {} ({} baud)", path, baud);
        Ok(Self::from_link(Box::new(link)))
    }

    /// Open with an explicit hardware read timeout.
    #[cfg(unix)]
    pub fn connect_with_timeout(
        path: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Self, PortError> {
        let link = TtyLink::open_with_timeout(path, baud, timeout)?;
        info!("Connected to MAKCU at {} ({} baud)", path, baud);
        Ok(Self::from_link(Box::new(link)))
    }

    /// Discover the device and connect at the configured initial baud rate.
    #[cfg(unix)]
    pub fn autoconnect(config: &DriverConfig) -> crate::error::DriverResult<Self> {
        let path = DeviceLocator::new().find()?;
        let handle = Self::connect_with_timeout(
            &path.to_string_lossy(),
            config.initial_baud,
            config.read_timeout(),
        )?;
        Ok(handle)
    }

    /// Wrap an already-open link in a handle.
    ///
    /// Used by the renegotiation protocol when rebuilding the connection,
    /// and by tests injecting a mock link.
    pub fn from_link(link: Box<dyn SerialLink>) -> Self {
        Self {
            path: link.name().to_string(),
            baud: link.baud_rate(),
            link: Some(link),
        }
    }

    /// The resolved device path this handle was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The baud rate the link is configured at.
    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// Whether the handle still owns a live link.
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Write bytes to the device.
    ///
    /// Returns the number of bytes the OS accepted. Every payload is
    /// mirrored to the diagnostic log at debug verbosity.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let link = self.link.as_mut().ok_or(PortError::Closed)?;
        debug!("Sending {:?}", String::from_utf8_lossy(data));
        link.write_bytes(data)
    }

    /// Read bytes from the device into `buffer`.
    ///
    /// A hardware timeout with nothing received is reported as `Ok(0)`:
    /// "no more data currently available" is not an error.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let link = self.link.as_mut().ok_or(PortError::Closed)?;
        match link.read_bytes(buffer) {
            Ok(n) => Ok(n),
            Err(PortError::Io(e))
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Block until every queued output byte has left the host.
    pub fn drain(&mut self) -> Result<(), PortError> {
        let link = self.link.as_mut().ok_or(PortError::Closed)?;
        link.drain()
    }

    /// Close the connection, releasing the advisory lock and the resource.
    ///
    /// A second close reports [`PortError::Closed`]; the handle never
    /// double-releases the underlying resource.
    pub fn close(&mut self) -> Result<(), PortError> {
        match self.link.take() {
            Some(link) => {
                drop(link);
                info!("Closed connection to {}", self.path);
                Ok(())
            }
            None => Err(PortError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockLink;

    fn mock_handle() -> (DeviceHandle, MockLink) {
        let link = MockLink::new("MOCK0", 115_200);
        let probe = link.clone();
        (DeviceHandle::from_link(Box::new(link)), probe)
    }

    #[test]
    fn test_from_link_captures_identity() {
        let (handle, _) = mock_handle();
        assert_eq!(handle.path(), "MOCK0");
        assert_eq!(handle.baud(), 115_200);
        assert!(handle.is_connected());
    }

    #[test]
    fn test_write_passes_through() {
        let (mut handle, probe) = mock_handle();
        let n = handle.write(b"km.left(1)\r").unwrap();
        assert_eq!(n, 11);
        assert_eq!(probe.write_log()[0], b"km.left(1)\r");
    }

    #[test]
    fn test_read_timeout_is_short_read() {
        let (mut handle, _) = mock_handle();
        let mut buf = [0u8; 16];
        // Nothing queued: the mock reports TimedOut, the handle maps it to 0.
        assert_eq!(handle.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_close_twice_reports_error() {
        let (mut handle, _) = mock_handle();
        handle.close().unwrap();
        assert!(!handle.is_connected());
        assert!(matches!(handle.close(), Err(PortError::Closed)));
    }

    #[test]
    fn test_io_after_close_reports_closed() {
        let (mut handle, _) = mock_handle();
        handle.close().unwrap();

        assert!(matches!(handle.write(b"x"), Err(PortError::Closed)));
        let mut buf = [0u8; 4];
        assert!(matches!(handle.read(&mut buf), Err(PortError::Closed)));
        assert!(matches!(handle.drain(), Err(PortError::Closed)));
    }
}
