//! Port abstraction layer for the raw serial link.
//!
//! Provides the `SerialLink` trait plus the real tty-backed implementation
//! and a mock, enabling dependency injection and testing without hardware.

pub mod error;
pub mod mock;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use error::PortError;
pub use mock::MockLink;
pub use traits::{is_supported_baud, SerialLink, SUPPORTED_BAUDS};

#[cfg(unix)]
pub use tty::{TtyLink, DEFAULT_READ_TIMEOUT};
