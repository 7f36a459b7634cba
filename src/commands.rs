//! Command templates and response classification for the MAKCU wire protocol.
//!
//! Every command is a parenthesized ASCII call terminated by a carriage
//! return, e.g. `km.left(1)\r`. Formatting here is pure: nothing in this
//! module touches the link, which keeps the templates directly testable.

use crate::error::{DriverError, DriverResult};
use serde::{Deserialize, Serialize};

/// Status query; the device replies with a short textual line.
pub const BUTTONS_QUERY: &str = "km.buttons()\r";

/// Firmware identity probe used after the speed switch.
pub const VERSION_QUERY: &str = "km.version()\r";

/// Marker substring the identity probe response must contain.
pub const IDENTITY_MARKER: &str = "MAKCU";

/// Clickable mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Command mnemonic for this button.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        }
    }
}

/// Targets of the lock/unlock commands.
///
/// Besides the five physical buttons, the device can freeze either motion
/// axis independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockTarget {
    Left,
    Right,
    Middle,
    Side1,
    Side2,
    AxisX,
    AxisY,
}

impl LockTarget {
    /// All lock targets, in wire-protocol order.
    pub const ALL: [LockTarget; 7] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::Side1,
        Self::Side2,
        Self::AxisX,
        Self::AxisY,
    ];

    /// Command mnemonic for this lock target.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Left => "lock_ml",
            Self::Right => "lock_mr",
            Self::Middle => "lock_mm",
            Self::Side1 => "lock_ms1",
            Self::Side2 => "lock_ms2",
            Self::AxisX => "lock_mx",
            Self::AxisY => "lock_my",
        }
    }
}

/// Format a button down (`pressed = true`) or up event.
pub fn button_event(button: MouseButton, pressed: bool) -> String {
    format!("km.{}({})\r", button.mnemonic(), pressed as u8)
}

/// Format a down-then-up pair delivered in a single write.
pub fn click_pair(button: MouseButton) -> String {
    let m = button.mnemonic();
    format!("km.{m}(1)\r km.{m}(0)\r")
}

/// Format a lock/unlock command; `value` must be 1 (lock) or 0 (unlock).
pub fn lock(target: LockTarget, value: i32) -> DriverResult<String> {
    if value != 0 && value != 1 {
        return Err(DriverError::invalid_argument(format!(
            "lock value must be 1 (lock) or 0 (unlock), got {value}"
        )));
    }
    Ok(format!("km.{}({})\r", target.mnemonic(), value))
}

/// Format a relative scroll command.
pub fn wheel(delta: i32) -> String {
    format!("km.wheel({delta})\r")
}

/// Format a relative move command.
pub fn move_rel(x: i32, y: i32) -> String {
    format!("km.move({x}, {y})\r")
}

/// Format a curve-assisted move command.
///
/// The device accepts zero extra parameters (plain move), one (segment
/// count; higher fits a smoother curve), or exactly three (segment count
/// plus two curve-shape controls). Any other count is rejected before a
/// byte goes out.
pub fn move_curve(x: i32, y: i32, params: &[i32]) -> DriverResult<String> {
    match params {
        [] => Ok(move_rel(x, y)),
        [p0] => Ok(format!("km.move({x}, {y}, {p0})\r")),
        [p0, p1, p2] => Ok(format!("km.move({x}, {y}, {p0}, {p1}, {p2})\r")),
        _ => Err(DriverError::invalid_argument(format!(
            "curve move takes 0, 1, or 3 extra parameters, got {}",
            params.len()
        ))),
    }
}

/// Format the button-reporting toggle command.
pub fn button_reporting(enable: bool) -> &'static str {
    if enable {
        "km.buttons(1)\r"
    } else {
        "km.buttons(0)\r"
    }
}

/// Classify a raw response to the buttons query.
///
/// The reply is inspected for substring markers rather than structurally
/// parsed; `"1"` is checked before `"0"`, matching the device protocol's
/// established precedence.
pub fn parse_button_status(raw: &[u8]) -> DriverResult<u8> {
    let response = String::from_utf8_lossy(raw);
    if response.contains('1') {
        Ok(1)
    } else if response.contains('0') {
        Ok(0)
    } else {
        Err(DriverError::ParseFailure(response.into_owned()))
    }
}
