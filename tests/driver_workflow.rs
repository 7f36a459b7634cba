//! End-to-end driver workflow tests against the mock link.
//!
//! Exercises the public API the way a caller would: connect, renegotiate,
//! issue mouse actions, close. No hardware required.

use makcu::handshake::{renegotiate_with, SettleTimings};
use makcu::{
    DeviceHandle, DriverError, LockTarget, MockLink, MouseButton, PortError, SPEED_SWITCH_FRAME,
    TARGET_BAUD,
};

fn mock_handle(baud: u32) -> (DeviceHandle, MockLink) {
    let link = MockLink::new("MOCK0", baud);
    let probe = link.clone();
    (DeviceHandle::from_link(Box::new(link)), probe)
}

#[test]
fn test_full_session_against_mock_device() {
    let (handle, old_probe) = mock_handle(115_200);

    let mut new_link = MockLink::new("MOCK0", TARGET_BAUD);
    new_link.enqueue_read(b"km.MAKCU.v3.2\r\n");
    let new_probe = new_link.clone();

    let mut handle = renegotiate_with(
        handle,
        move |_, _| Ok(DeviceHandle::from_link(Box::new(new_link))),
        &SettleTimings::none(),
    )
    .expect("handshake against a well-behaved mock must succeed");

    assert_eq!(handle.baud(), TARGET_BAUD);
    assert_eq!(old_probe.write_log(), vec![SPEED_SWITCH_FRAME.to_vec()]);

    handle.move_mouse(10, 20).unwrap();
    handle.click(MouseButton::Left).unwrap();
    handle.scroll(-1).unwrap();
    handle.lock(LockTarget::AxisY, 1).unwrap();
    handle.lock(LockTarget::AxisY, 0).unwrap();
    handle.close().unwrap();

    let log = new_probe.write_log();
    // Index 0 is the version probe sent during the handshake.
    assert_eq!(log[1], b"km.move(10, 20)\r");
    assert_eq!(log[2], b"km.left(1)\r km.left(0)\r");
    assert_eq!(log[3], b"km.wheel(-1)\r");
    assert_eq!(log[4], b"km.lock_my(1)\r");
    assert_eq!(log[5], b"km.lock_my(0)\r");
}

#[test]
fn test_down_always_precedes_up() {
    for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
        let (mut handle, probe) = mock_handle(TARGET_BAUD);
        handle
            .click_with_hold(button, std::time::Duration::ZERO)
            .unwrap();

        let log = probe.write_log();
        let down = format!("km.{}(1)\r", button.mnemonic()).into_bytes();
        let up = format!("km.{}(0)\r", button.mnemonic()).into_bytes();
        assert_eq!(log, vec![down, up]);
    }
}

#[test]
fn test_handshake_failure_leaves_no_live_handle() {
    let (handle, old_probe) = mock_handle(115_200);

    let mut new_link = MockLink::new("MOCK0", TARGET_BAUD);
    new_link.enqueue_read(b"????");
    let new_probe = new_link.clone();

    let result = renegotiate_with(
        handle,
        move |_, _| Ok(DeviceHandle::from_link(Box::new(new_link))),
        &SettleTimings::none(),
    );

    assert!(matches!(result, Err(DriverError::HandshakeFailed { .. })));
    // Old handle got the switch frame before being torn down; the new link
    // saw only the failed probe.
    assert_eq!(old_probe.write_log().len(), 1);
    assert_eq!(new_probe.write_log().len(), 1);
}

#[test]
fn test_truncated_switch_frame_aborts_before_reopen() {
    let mut link = MockLink::new("MOCK0", 115_200);
    link.set_short_write(7);
    let handle = DeviceHandle::from_link(Box::new(link));

    let result = renegotiate_with(
        handle,
        |_, _| panic!("reopen must not be attempted"),
        &SettleTimings::none(),
    );

    assert!(matches!(
        result,
        Err(DriverError::ProtocolViolation { written: 7 })
    ));
}

#[test]
fn test_close_is_guarded_against_double_release() {
    let (mut handle, _) = mock_handle(TARGET_BAUD);
    handle.close().unwrap();
    assert!(matches!(handle.close(), Err(PortError::Closed)));

    // Subsequent actions report the closed link, not a crash.
    assert!(matches!(
        handle.move_mouse(1, 1),
        Err(DriverError::Port(PortError::Closed))
    ));
}

#[test]
fn test_status_query_reads_bounded_reply() {
    let (mut handle, mut probe) = mock_handle(TARGET_BAUD);

    probe.enqueue_read(b"km.buttons()\r\n1\r\n>>> ");
    assert_eq!(handle.button_status().unwrap(), 1);
    assert_eq!(probe.write_log()[0], b"km.buttons()\r");
}
