//! Mouse-action helpers.
//!
//! Thin formatting layer over the command protocol: each helper builds one
//! deterministic command string and forwards it through the handle. No
//! helper expects a response except the explicit status query.

use crate::commands::{self, LockTarget, MouseButton};
use crate::device::DeviceHandle;
use crate::error::DriverResult;
use std::time::Duration;

/// Bounded buffer size for the buttons-query reply.
const STATUS_BUFFER_LEN: usize = 128;

impl DeviceHandle {
    /// Press a mouse button (down event only).
    pub fn press(&mut self, button: MouseButton) -> DriverResult<()> {
        self.write(commands::button_event(button, true).as_bytes())?;
        Ok(())
    }

    /// Release a mouse button (up event only).
    pub fn release(&mut self, button: MouseButton) -> DriverResult<()> {
        self.write(commands::button_event(button, false).as_bytes())?;
        Ok(())
    }

    /// Click a button: down and up delivered in a single write.
    pub fn click(&mut self, button: MouseButton) -> DriverResult<()> {
        self.write(commands::click_pair(button).as_bytes())?;
        Ok(())
    }

    /// Click with an explicit hold: down, sleep, up as two writes.
    ///
    /// With a zero `hold` this still issues two writes in order, without
    /// sleeping in between.
    pub fn click_with_hold(&mut self, button: MouseButton, hold: Duration) -> DriverResult<()> {
        self.press(button)?;
        if !hold.is_zero() {
            std::thread::sleep(hold);
        }
        self.release(button)
    }

    /// Lock (`value = 1`) or unlock (`value = 0`) a button or motion axis.
    ///
    /// Any other value is rejected before a byte goes out.
    pub fn lock(&mut self, target: LockTarget, value: i32) -> DriverResult<()> {
        let cmd = commands::lock(target, value)?;
        self.write(cmd.as_bytes())?;
        Ok(())
    }

    /// Query the device's button state.
    ///
    /// The reply is classified heuristically by substring presence;
    /// returns 1 or 0, or a parse failure for anything else.
    pub fn button_status(&mut self) -> DriverResult<u8> {
        self.write(commands::BUTTONS_QUERY.as_bytes())?;

        let mut buf = [0u8; STATUS_BUFFER_LEN];
        let n = self.read(&mut buf)?;
        commands::parse_button_status(&buf[..n])
    }

    /// Enable or disable button-state reporting on the device.
    pub fn set_button_reporting(&mut self, enable: bool) -> DriverResult<()> {
        self.write(commands::button_reporting(enable).as_bytes())?;
        Ok(())
    }

    /// Scroll the wheel by a signed amount.
    pub fn scroll(&mut self, delta: i32) -> DriverResult<()> {
        self.write(commands::wheel(delta).as_bytes())?;
        Ok(())
    }

    /// Move the pointer by a relative offset.
    pub fn move_mouse(&mut self, x: i32, y: i32) -> DriverResult<()> {
        self.write(commands::move_rel(x, y).as_bytes())?;
        Ok(())
    }

    /// Move the pointer along a device-fitted curve.
    ///
    /// `params` carries the curve controls: empty for a plain move, one
    /// element for the segment count, or exactly three for segment count
    /// plus shape controls. Available on firmware v3 and later.
    pub fn move_mouse_curve(&mut self, x: i32, y: i32, params: &[i32]) -> DriverResult<()> {
        let cmd = commands::move_curve(x, y, params)?;
        self.write(cmd.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use crate::port::{MockLink, PortError};

    fn mock_handle() -> (DeviceHandle, MockLink) {
        let link = MockLink::new("MOCK0", 4_000_000);
        let probe = link.clone();
        (DeviceHandle::from_link(Box::new(link)), probe)
    }

    #[test]
    fn test_press_release_wire_format() {
        let (mut handle, probe) = mock_handle();
        handle.press(MouseButton::Left).unwrap();
        handle.release(MouseButton::Left).unwrap();

        let log = probe.write_log();
        assert_eq!(log[0], b"km.left(1)\r");
        assert_eq!(log[1], b"km.left(0)\r");
    }

    #[test]
    fn test_click_is_single_write() {
        let (mut handle, probe) = mock_handle();
        handle.click(MouseButton::Right).unwrap();

        let log = probe.write_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0], b"km.right(1)\r km.right(0)\r");
    }

    #[test]
    fn test_click_with_hold_orders_down_before_up() {
        let (mut handle, probe) = mock_handle();
        handle
            .click_with_hold(MouseButton::Middle, Duration::ZERO)
            .unwrap();

        let log = probe.write_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], b"km.middle(1)\r");
        assert_eq!(log[1], b"km.middle(0)\r");
    }

    #[test]
    fn test_lock_rejects_bad_value_before_io() {
        let (mut handle, probe) = mock_handle();
        let result = handle.lock(LockTarget::Side1, 2);

        assert!(matches!(result, Err(DriverError::InvalidArgument(_))));
        assert!(probe.write_log().is_empty());
    }

    #[test]
    fn test_button_status_classification() {
        let (mut handle, mut probe) = mock_handle();

        probe.enqueue_read(b"1\r\n");
        assert_eq!(handle.button_status().unwrap(), 1);

        probe.enqueue_read(b"0\r\n");
        assert_eq!(handle.button_status().unwrap(), 0);

        probe.enqueue_read(b"xx");
        assert!(matches!(
            handle.button_status(),
            Err(DriverError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_scroll_and_move_wire_format() {
        let (mut handle, probe) = mock_handle();
        handle.scroll(-2).unwrap();
        handle.move_mouse(5, -3).unwrap();
        handle.move_mouse_curve(5, -3, &[16]).unwrap();

        let log = probe.write_log();
        assert_eq!(log[0], b"km.wheel(-2)\r");
        assert_eq!(log[1], b"km.move(5, -3)\r");
        assert_eq!(log[2], b"km.move(5, -3, 16)\r");
    }

    #[test]
    fn test_curve_rejects_bad_count_before_io() {
        let (mut handle, probe) = mock_handle();
        let result = handle.move_mouse_curve(1, 1, &[2, 3]);

        assert!(matches!(result, Err(DriverError::InvalidArgument(_))));
        assert!(probe.write_log().is_empty());
    }

    #[test]
    fn test_helpers_fail_on_closed_handle() {
        let (mut handle, _) = mock_handle();
        handle.close().unwrap();

        assert!(matches!(
            handle.press(MouseButton::Left),
            Err(DriverError::Port(PortError::Closed))
        ));
        assert!(matches!(
            handle.scroll(1),
            Err(DriverError::Port(PortError::Closed))
        ));
        assert!(matches!(
            handle.button_status(),
            Err(DriverError::Port(PortError::Closed))
        ));
    }
}
