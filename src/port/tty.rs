//! Unix tty-backed serial link.
//!
//! Wraps the `serialport` crate's native `TTYPort` with our own `SerialLink`
//! trait. On top of what the builder configures (raw mode, 8N1, no flow
//! control), this adds the exclusive non-blocking advisory lock that keeps a
//! second process from opening the same device node mid-session.

use super::error::PortError;
use super::traits::{is_supported_baud, SerialLink};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits, TTYPort};
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::time::Duration;
use tracing::warn;

/// Default hardware read timeout. Reads return whatever arrived (possibly
/// nothing) once this expires instead of blocking indefinitely.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial link backed by a real tty device node.
pub struct TtyLink {
    /// The underlying serial port, configured in raw mode.
    port: TTYPort,
    /// The device node path for identification.
    name: String,
    /// The baud rate the link was opened at.
    baud: u32,
}

impl TtyLink {
    /// Open a device node as a raw serial link at the given baud rate.
    ///
    /// The baud rate is validated against the supported table before any
    /// open attempt, so an unmapped rate never touches the filesystem.
    /// After opening, an exclusive non-blocking `flock` is taken on the
    /// descriptor and any stale buffered input/output is discarded.
    ///
    /// # Example
    /// ```no_run
    /// use makcu::port::TtyLink;
    ///
    /// let link = TtyLink::open("/dev/ttyACM0", 115_200)?;
    /// # Ok::<(), makcu::port::PortError>(())
    /// ```
    pub fn open(path: &str, baud: u32) -> Result<Self, PortError> {
        Self::open_with_timeout(path, baud, DEFAULT_READ_TIMEOUT)
    }

    /// Open with an explicit hardware read timeout.
    pub fn open_with_timeout(
        path: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Self, PortError> {
        if !is_supported_baud(baud) {
            return Err(PortError::UnsupportedBaud(baud));
        }

        let mut port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open_native()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(path),
                serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    PortError::not_found(path)
                }
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            })?;

        // open_native sets TIOCEXCL, which would make a second open fail at
        // open(2) with EBUSY before the flock is ever consulted. The advisory
        // flock below is the single lock authority, so a contending open must
        // reach it and get the distinct Locked error.
        port.set_exclusive(false)
            .map_err(|e| PortError::config(e.to_string()))?;

        let mut link = Self {
            port,
            name: path.to_string(),
            baud,
        };

        link.lock_exclusive()?;
        link.clear_buffers()?;

        Ok(link)
    }

    /// Take the exclusive non-blocking advisory lock on the descriptor.
    fn lock_exclusive(&self) -> Result<(), PortError> {
        let fd = self.port.as_raw_fd();
        // Safety: fd is a valid open descriptor owned by self.port.
        let rc = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            return if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
                Err(PortError::locked(&self.name))
            } else {
                Err(PortError::Io(err))
            };
        }
        Ok(())
    }
}

impl SerialLink for TtyLink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(PortError::Io)
    }

    fn drain(&mut self) -> Result<(), PortError> {
        let fd = self.port.as_raw_fd();
        // Safety: fd is a valid open descriptor owned by self.port.
        let rc = unsafe { libc::tcdrain(fd) };
        if rc != 0 {
            return Err(PortError::Io(std::io::Error::last_os_error()));
        }
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        self.port
            .clear(serialport::ClearBuffer::All)
            .map_err(PortError::Serial)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn baud_rate(&self) -> u32 {
        self.baud
    }
}

impl Drop for TtyLink {
    fn drop(&mut self) {
        // Best-effort unlock; process exit releases the lock anyway, so a
        // failure here is logged rather than escalated.
        let fd = self.port.as_raw_fd();
        let rc = unsafe { libc::flock(fd, libc::LOCK_UN) };
        if rc != 0 {
            warn!(
                "Failed to release advisory lock on {}: {}",
                self.name,
                std::io::Error::last_os_error()
            );
        }
    }
}

impl std::fmt::Debug for TtyLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyLink")
            .field("name", &self.name)
            .field("baud", &self.baud)
            .finish()
    }
}
