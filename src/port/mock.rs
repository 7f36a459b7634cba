//! Mock serial link implementation for testing.
//!
//! Provides a `MockLink` that simulates the device side of the serial link
//! without requiring actual hardware. Supports configurable read queues,
//! write logging, and fault injection for short writes and I/O errors.

use super::error::PortError;
use super::traits::SerialLink;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Inner state of the mock link, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockLinkState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Log of all byte sequences written to the link.
    write_log: Vec<Vec<u8>>,
    /// If set, the next write reports at most this many bytes accepted.
    short_write_limit: Option<usize>,
    /// Whether the next read/write should fail with an I/O error.
    fail_next_io: bool,
    /// Number of times the output queue was drained.
    drain_count: usize,
    /// Whether buffers have been cleared.
    buffers_cleared: bool,
}

/// Mock serial link for testing.
///
/// Clones share state, so a test can keep one clone for inspection while the
/// device handle under test owns the other.
///
/// # Example
/// ```
/// use makcu::port::{MockLink, SerialLink};
///
/// let mut link = MockLink::new("MOCK0", 115_200);
/// link.enqueue_read(b"km.MAKCU\r\n");
///
/// let mut buffer = [0u8; 32];
/// let n = link.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"km.MAKCU\r\n");
///
/// link.write_bytes(b"km.version()\r").unwrap();
/// assert_eq!(link.write_log()[0], b"km.version()\r");
/// ```
#[derive(Clone)]
pub struct MockLink {
    /// The link name/identifier.
    name: String,
    /// The baud rate this mock claims to be configured at.
    baud: u32,
    /// The internal state, shared between clones.
    state: Arc<Mutex<MockLinkState>>,
}

impl MockLink {
    /// Create a new mock link with the given name and baud rate.
    pub fn new(name: impl Into<String>, baud: u32) -> Self {
        Self {
            name: name.into(),
            baud,
            state: Arc::new(Mutex::new(MockLinkState::default())),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.read_queue.extend(data);
    }

    /// Make the next write report at most `limit` bytes accepted.
    pub fn set_short_write(&mut self, limit: usize) {
        let mut state = self.state.lock().unwrap();
        state.short_write_limit = Some(limit);
    }

    /// Make the next read or write fail with an I/O error.
    pub fn set_fail_next_io(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.fail_next_io = true;
    }

    /// Get a copy of all data written to the link, in write order.
    pub fn write_log(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.write_log.clone()
    }

    /// Get the number of times `drain` was called.
    pub fn drain_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.drain_count
    }

    /// Get whether buffers have been cleared since creation.
    pub fn was_cleared(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.buffers_cleared
    }

    /// Get the number of bytes still queued for reading.
    pub fn available_bytes(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.read_queue.len()
    }
}

impl SerialLink for MockLink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if state.fail_next_io {
            state.fail_next_io = false;
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )));
        }

        let accepted = match state.short_write_limit.take() {
            Some(limit) => data.len().min(limit),
            None => data.len(),
        };

        state.write_log.push(data[..accepted].to_vec());
        Ok(accepted)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if state.fail_next_io {
            state.fail_next_io = false;
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated read failure",
            )));
        }

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            if let Some(queued) = state.read_queue.pop_front() {
                *byte = queued;
                bytes_read += 1;
            } else {
                break;
            }
        }

        if bytes_read == 0 {
            // Mirror the hardware timeout: no data within the window.
            Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "no data available",
            )))
        } else {
            Ok(bytes_read)
        }
    }

    fn drain(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        state.drain_count += 1;
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        state.read_queue.clear();
        state.buffers_cleared = true;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn baud_rate(&self) -> u32 {
        self.baud
    }
}

impl std::fmt::Debug for MockLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLink")
            .field("name", &self.name)
            .field("baud", &self.baud)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
