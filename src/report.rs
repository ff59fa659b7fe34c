//! Xbox 360 controller state report (XInput wire format).
//!
//! Layout (20 bytes, sent on the interrupt IN endpoint):
//! ```text
//! Byte 0:     Report ID (always 0x00)
//! Byte 1:     Report size (always 0x14 = 20)
//! Byte 2:     Buttons low  - D-pad, Start, Back, L3, R3
//! Byte 3:     Buttons high - LB, RB, Guide, (unused), A, B, X, Y
//! Byte 4:     Left trigger (0-255)
//! Byte 5:     Right trigger (0-255)
//! Byte 6-7:   Left stick X  (i16, little-endian)
//! Byte 8-9:   Left stick Y
//! Byte 10-11: Right stick X
//! Byte 12-13: Right stick Y
//! Byte 14-19: Reserved (always 0x00)
//! ```

/// Report size in bytes.
pub const XINPUT_REPORT_SIZE: usize = 20;

/// Digital button state as a 16-bit field with XInput bit positions.
///
/// Low byte lands in report byte 2, high byte in report byte 3. Bit 11
/// (0x0800) is unused on real hardware and stays reserved here.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u16);

impl Buttons {
    // Report byte 2
    pub const DPAD_UP: Self = Self(0x0001);
    pub const DPAD_DOWN: Self = Self(0x0002);
    pub const DPAD_LEFT: Self = Self(0x0004);
    pub const DPAD_RIGHT: Self = Self(0x0008);
    pub const START: Self = Self(0x0010);
    pub const BACK: Self = Self(0x0020);
    /// Left stick click (L3).
    pub const LS: Self = Self(0x0040);
    /// Right stick click (R3).
    pub const RS: Self = Self(0x0080);

    // Report byte 3
    /// Left bumper.
    pub const LB: Self = Self(0x0100);
    /// Right bumper.
    pub const RB: Self = Self(0x0200);
    /// Xbox Guide button.
    pub const GUIDE: Self = Self(0x0400);
    // 0x0800 unused
    pub const A: Self = Self(0x1000);
    pub const B: Self = Self(0x2000);
    pub const X: Self = Self(0x4000);
    pub const Y: Self = Self(0x8000);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: Buttons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Set or clear button(s).
    #[inline]
    pub fn set(&mut self, button: Buttons, pressed: bool) {
        if pressed {
            self.0 |= button.0;
        } else {
            self.0 &= !button.0;
        }
    }

    /// Raw 16-bit value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Map the BLE HID library's stick-click mask bits onto XInput L3/R3.
    ///
    /// The wireless transport reports LS/RS as 0x2000/0x4000; everything
    /// else it sends already uses XInput positions.
    #[must_use]
    pub fn from_ble_mask(ble: u16) -> Self {
        let mut out = Self::NONE;
        if ble & 0x2000 != 0 {
            out |= Self::LS;
        }
        if ble & 0x4000 != 0 {
            out |= Self::RS;
        }
        out
    }
}

impl core::ops::BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One full controller state snapshot in wire layout.
///
/// The report ID and size bytes are constants owned by this type; callers
/// never supply them. A single mutable instance lives inside the report
/// transfer path and is overwritten completely on every send, so stale
/// fields cannot leak between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XinputReport {
    pub buttons: Buttons,
    pub trigger_left: u8,
    pub trigger_right: u8,
    pub stick_left_x: i16,
    pub stick_left_y: i16,
    pub stick_right_x: i16,
    pub stick_right_y: i16,
}

impl XinputReport {
    /// Neutral state: no buttons, sticks centered, triggers released.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: Buttons::NONE,
            trigger_left: 0,
            trigger_right: 0,
            stick_left_x: 0,
            stick_left_y: 0,
            stick_right_x: 0,
            stick_right_y: 0,
        }
    }

    /// Serialise into the fixed 20-byte wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; XINPUT_REPORT_SIZE] {
        let mut buf = [0u8; XINPUT_REPORT_SIZE];
        buf[0] = 0x00; // report ID
        buf[1] = XINPUT_REPORT_SIZE as u8;
        buf[2] = (self.buttons.raw() & 0xFF) as u8;
        buf[3] = (self.buttons.raw() >> 8) as u8;
        buf[4] = self.trigger_left;
        buf[5] = self.trigger_right;
        buf[6..8].copy_from_slice(&self.stick_left_x.to_le_bytes());
        buf[8..10].copy_from_slice(&self.stick_left_y.to_le_bytes());
        buf[10..12].copy_from_slice(&self.stick_right_x.to_le_bytes());
        buf[12..14].copy_from_slice(&self.stick_right_y.to_le_bytes());
        // bytes 14..20 stay zero
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_set_clear() {
        let mut buttons = Buttons::NONE;
        buttons.set(Buttons::A, true);
        assert!(buttons.contains(Buttons::A));
        buttons.set(Buttons::A, false);
        assert!(!buttons.contains(Buttons::A));
    }

    #[test]
    fn buttons_split_across_report_bytes() {
        let report = XinputReport {
            buttons: Buttons::DPAD_UP | Buttons::A,
            ..XinputReport::neutral()
        };
        let bytes = report.to_bytes();
        assert_eq!(bytes[2], 0x01); // D-pad up in the low byte
        assert_eq!(bytes[3], 0x10); // A in the high byte
    }

    #[test]
    fn ble_mask_maps_stick_clicks() {
        assert_eq!(Buttons::from_ble_mask(0x2000), Buttons::LS);
        assert_eq!(Buttons::from_ble_mask(0x4000), Buttons::RS);
        assert_eq!(Buttons::from_ble_mask(0x6000), Buttons::LS | Buttons::RS);
        assert_eq!(Buttons::from_ble_mask(0x9FFF), Buttons::NONE);
    }

    #[test]
    fn wire_layout_golden() {
        let report = XinputReport {
            buttons: Buttons::A,
            trigger_left: 10,
            trigger_right: 20,
            stick_left_x: 100,
            stick_left_y: -100,
            stick_right_x: 0,
            stick_right_y: 0,
        };
        let bytes = report.to_bytes();
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 0x14);
        assert_eq!(bytes[2], 0x00);
        assert_eq!(bytes[3], 0x10);
        assert_eq!(bytes[4], 10);
        assert_eq!(bytes[5], 20);
        assert_eq!(i16::from_le_bytes([bytes[6], bytes[7]]), 100);
        assert_eq!(i16::from_le_bytes([bytes[8], bytes[9]]), -100);
        assert_eq!(i16::from_le_bytes([bytes[10], bytes[11]]), 0);
        assert_eq!(i16::from_le_bytes([bytes[12], bytes[13]]), 0);
        assert_eq!(&bytes[14..], &[0; 6]);
    }
}
