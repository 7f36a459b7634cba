//! Speed renegotiation protocol.
//!
//! The device must be told in-band to switch its own UART speed before the
//! host reconfigures its side; changing the host first would desynchronize
//! the link. The protocol is therefore a two-phase handshake:
//!
//! 1. Send a fixed 9-byte binary instruction at the current speed and drain
//!    the output queue so it is guaranteed to have left the host.
//! 2. Tear down the link, reopen at the target speed, and verify the device
//!    answers the identity probe before handing the new handle back.
//!
//! [`renegotiate`] consumes the old handle, so on return there is exactly
//! one live reference: the validated new handle, or none at all.

use crate::commands::{IDENTITY_MARKER, VERSION_QUERY};
use crate::device::DeviceHandle;
use crate::error::{DriverError, DriverResult};
use crate::port::PortError;
use std::time::Duration;
use tracing::{debug, error};

/// The fixed in-band speed-switch instruction: magic header `DE AD`
/// followed by the opcode/length/payload sequence.
pub const SPEED_SWITCH_FRAME: [u8; 9] = [0xDE, 0xAD, 0x05, 0x00, 0xA5, 0x00, 0x09, 0x3D, 0x00];

/// The fixed high operating speed the device switches to.
pub const TARGET_BAUD: u32 = 4_000_000;

/// Size of the bounded buffer for the identity probe response.
const PROBE_BUFFER_LEN: usize = 32;

/// Settle intervals between handshake phases.
///
/// The defaults match the device's observed switching behavior; tests
/// substitute [`SettleTimings::none`] to run the protocol at full speed
/// against a mock link.
#[derive(Debug, Clone)]
pub struct SettleTimings {
    /// Wait after closing the old link, while the device switches its UART.
    pub device_switch: Duration,
    /// Wait after reopening, before the identity probe.
    pub post_reconnect: Duration,
    /// Wait after a successful probe, before returning the new handle.
    pub post_verify: Duration,
}

impl Default for SettleTimings {
    fn default() -> Self {
        Self {
            device_switch: Duration::from_millis(100),
            post_reconnect: Duration::from_secs(1),
            post_verify: Duration::from_secs(1),
        }
    }
}

impl SettleTimings {
    /// Zero-length settle intervals, for tests against a mock link.
    pub fn none() -> Self {
        Self {
            device_switch: Duration::ZERO,
            post_reconnect: Duration::ZERO,
            post_verify: Duration::ZERO,
        }
    }
}

/// Move an established connection to the fixed high operating speed.
///
/// Consumes `handle`; the old reference is closed on every path. Returns
/// the validated replacement handle, or an error if either phase failed.
#[cfg(unix)]
pub fn renegotiate(handle: DeviceHandle) -> DriverResult<DeviceHandle> {
    renegotiate_with(
        handle,
        |path, baud| DeviceHandle::connect(path, baud),
        &SettleTimings::default(),
    )
}

/// Run the handshake with an injected reopen function and settle timings.
///
/// This is the full protocol; [`renegotiate`] wires it to the real
/// connector. Exposed so the exchange can be exercised against mock links.
pub fn renegotiate_with<F>(
    mut handle: DeviceHandle,
    reopen: F,
    timings: &SettleTimings,
) -> DriverResult<DeviceHandle>
where
    F: FnOnce(&str, u32) -> Result<DeviceHandle, PortError>,
{
    let path = handle.path().to_string();

    // Phase 1: in-band instruction at the current speed.
    let written = match handle.write(&SPEED_SWITCH_FRAME) {
        Ok(n) => n,
        Err(e) => {
            let _ = handle.close();
            return Err(e.into());
        }
    };

    if written != SPEED_SWITCH_FRAME.len() {
        let _ = handle.close();
        return Err(DriverError::ProtocolViolation { written });
    }

    // The instruction must have left the host before the link goes down.
    if let Err(e) = handle.drain() {
        let _ = handle.close();
        return Err(e.into());
    }

    if let Err(e) = handle.close() {
        error!("Failed to close old connection during speed switch: {}", e);
    }

    // Phase 2: rebuild the link at the target speed and verify.
    std::thread::sleep(timings.device_switch);

    let mut fresh = reopen(&path, TARGET_BAUD)?;

    std::thread::sleep(timings.post_reconnect);

    if let Err(e) = fresh.write(VERSION_QUERY.as_bytes()) {
        let _ = fresh.close();
        return Err(e.into());
    }

    let mut buf = [0u8; PROBE_BUFFER_LEN];
    let n = match fresh.read(&mut buf) {
        Ok(n) => n,
        Err(e) => {
            let _ = fresh.close();
            return Err(e.into());
        }
    };

    let response = String::from_utf8_lossy(&buf[..n]).into_owned();
    if !response.contains(IDENTITY_MARKER) {
        let _ = fresh.close();
        return Err(DriverError::HandshakeFailed { response });
    }

    std::thread::sleep(timings.post_verify);

    debug!("Speed switch to {} baud verified on {}", TARGET_BAUD, path);
    Ok(fresh)
}
