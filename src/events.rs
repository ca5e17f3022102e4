//! Decoding of firmware hotkey events.
//!
//! The firmware handles the backlight hotkey itself and then reports what it
//! did. Brightness events are forwarded to
//! [`BacklightControl::notify_external_change`], never to
//! [`BacklightControl::set`], since the EC has already switched level.

use crate::controller::BacklightControl;
use log::trace;

/// Minimum length of an event buffer.
pub const EVENT_LEN: usize = 4;

/// Event codes reported by the firmware.
pub mod code {
    /// Touchpad toggled.
    pub const TOUCHPAD_TOGGLE: u8 = 0x02;
    /// Brightness changed; the new step is in the status word.
    pub const KBD_BRT_CHANGE: u8 = 0x03;
    /// Brightness set to maximum.
    pub const KBD_BRT_MAX: u8 = 0x07;
    /// Brightness set to the middle step.
    pub const KBD_BRT_MIDDLE: u8 = 0x08;
    /// Backlight switched off.
    pub const KBD_BRT_OFF: u8 = 0x09;
    /// Power-save profile selected.
    pub const MODE_POWER_SAVE: u8 = 0x11;
    /// Balanced profile selected.
    pub const MODE_BALANCE: u8 = 0x12;
    /// High-performance profile selected.
    pub const MODE_HIGH_PERFORMANCE: u8 = 0x13;
    /// Camera toggled.
    pub const CAMERA_TOGGLE: u8 = 0x30;
    /// Fn-lock toggled.
    pub const FNLOCK_TOGGLE: u8 = 0x31;
}

/// One decoded firmware event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareEvent {
    /// Firmware function number.
    pub function: u8,
    /// What happened, see [`code`].
    pub event_code: u8,
    /// Event-specific status word.
    pub device_status: u16,
}

impl FirmwareEvent {
    /// Decode `[function, event_code, status_lo, status_hi, ..]`.
    ///
    /// Returns `None` if the buffer is shorter than [`EVENT_LEN`].
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let &[function, event_code, lo, hi, ..] = buf else {
            return None;
        };
        let event = Self {
            function,
            event_code,
            device_status: u16::from_le_bytes([lo, hi]),
        };
        trace!(
            "event value: {} ({:#04x}), device status {} ({:#06x})",
            event.event_code, event.event_code, event.device_status, event.device_status
        );
        Some(event)
    }

    /// The brightness step this event reports, if it is a brightness event.
    ///
    /// The step is not range checked here.
    pub fn brightness_step(&self) -> Option<u32> {
        match self.event_code {
            code::KBD_BRT_MAX => Some(2),
            code::KBD_BRT_MIDDLE => Some(1),
            code::KBD_BRT_OFF => Some(0),
            code::KBD_BRT_CHANGE => Some(u32::from(self.device_status)),
            _ => None,
        }
    }
}

/// Decode `buf` and forward a brightness event to `control`.
///
/// Returns `true` if the buffer held a brightness event.
pub fn dispatch_event<B: BacklightControl + ?Sized>(control: &B, buf: &[u8]) -> bool {
    match FirmwareEvent::decode(buf).and_then(|event| event.brightness_step()) {
        Some(step) => {
            control.notify_external_change(step);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBacklight;

    #[test]
    fn test_decode() {
        let event = FirmwareEvent::decode(&[0x01, code::KBD_BRT_CHANGE, 0x02, 0x00, 0xff]).unwrap();
        assert_eq!(event.function, 0x01);
        assert_eq!(event.event_code, code::KBD_BRT_CHANGE);
        assert_eq!(event.device_status, 2);
        assert_eq!(event.brightness_step(), Some(2));

        assert_eq!(FirmwareEvent::decode(&[0x01, 0x07, 0x00]), None);
    }

    #[test]
    fn test_fixed_level_events() {
        let step = |c: u8| FirmwareEvent::decode(&[0, c, 0, 0]).unwrap().brightness_step();
        assert_eq!(step(code::KBD_BRT_MAX), Some(2));
        assert_eq!(step(code::KBD_BRT_MIDDLE), Some(1));
        assert_eq!(step(code::KBD_BRT_OFF), Some(0));
        assert_eq!(step(code::FNLOCK_TOGGLE), None);
    }

    #[test]
    fn test_dispatch_updates_without_writing() {
        let mock = MockBacklight::new();
        assert!(dispatch_event(&mock, &[0, code::KBD_BRT_MAX, 0, 0]));
        assert_eq!(mock.brightness().value(), 2);

        assert!(!dispatch_event(&mock, &[0, code::CAMERA_TOGGLE, 0x11, 0]));
        assert!(!dispatch_event(&mock, &[0, code::KBD_BRT_OFF]));
        assert_eq!(mock.brightness().value(), 2);

        // out of range status from the firmware is dropped by the controller
        assert!(dispatch_event(&mock, &[0, code::KBD_BRT_CHANGE, 0x00, 0x01]));
        assert_eq!(mock.brightness().value(), 2);
        assert_eq!(mock.hardware_writes(), 0);
    }
}
