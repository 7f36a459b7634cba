//! Host-side driver for the MAKCU USB mouse-emulation accessory.
//!
//! The MAKCU is a USB-serial device that accepts short ASCII commands to
//! emulate mouse input. This crate covers the device-communication layer:
//! discovery by hardware identifiers, connection lifecycle with raw serial
//! configuration, the in-band speed renegotiation handshake, and the
//! command/response contract the mouse-action helpers are built on.
//!
//! # Modules
//!
//! - `discovery`: locate the device via by-id aliases or sysfs VID/PID
//! - `port`: raw serial link (trait, tty implementation, mock)
//! - `device`: the owned connection handle
//! - `handshake`: two-phase renegotiation to the 4 Mbaud operating speed
//! - `commands`: command templates and response classification
//! - `actions`: mouse-action helpers on the handle
//! - `config`, `logging`, `error`: ambient concerns
//!
//! # Example
//!
//! ```no_run
//! use makcu::{handshake, DeviceHandle, DriverConfig, MouseButton};
//!
//! let config = DriverConfig::default();
//! makcu::logging::init(config.verbose);
//!
//! let handle = DeviceHandle::autoconnect(&config)?;
//! let mut handle = handshake::renegotiate(handle)?;
//!
//! handle.move_mouse(25, -10)?;
//! handle.click(MouseButton::Left)?;
//! handle.close()?;
//! # Ok::<(), makcu::DriverError>(())
//! ```

pub mod actions;
pub mod commands;
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod handshake;
pub mod logging;
pub mod port;

// Re-export commonly used types for convenience
pub use commands::{LockTarget, MouseButton};
pub use config::DriverConfig;
pub use device::DeviceHandle;
pub use discovery::{DeviceLocator, LocateStrategy};
pub use error::{DriverError, DriverResult};
pub use handshake::{SettleTimings, SPEED_SWITCH_FRAME, TARGET_BAUD};
pub use port::{MockLink, PortError, SerialLink, SUPPORTED_BAUDS};

#[cfg(unix)]
pub use port::TtyLink;
