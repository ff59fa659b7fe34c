//! Report transfer - feeds controller state to the interrupt IN endpoint.
//!
//! `send` is a single best-effort, non-blocking attempt. Every branch
//! that cannot make immediate progress returns `false` instead of
//! waiting; the caller's per-frame loop is the retry mechanism. Because a
//! new submission is refused while one is outstanding, reports reach the
//! host in submission order.

use crate::config::XINPUT_EP_IN;
use crate::driver::UsbDeviceStack;
use crate::personality::Personality;
use crate::report::{Buttons, XinputReport};

/// High-level controller front-end owning the single report instance.
///
/// The personality is captured once at construction (the boot-time read);
/// in upload mode the gamepad is inert. Not reentrant: `send` must only
/// be called from the caller's control loop.
#[derive(Debug)]
pub struct XinputGamepad {
    personality: Personality,
    report: XinputReport,
}

impl XinputGamepad {
    #[must_use]
    pub const fn new(personality: Personality) -> Self {
        Self {
            personality,
            report: XinputReport::neutral(),
        }
    }

    /// Attempt to send one full controller state report.
    ///
    /// Returns `true` when the report was accepted for transmission -
    /// not when the host received it; no completion is surfaced. Returns
    /// `false`, without side effects on the report, when the active
    /// personality is not the controller, and otherwise when the host has
    /// not configured the device yet or the IN endpoint is still busy
    /// with the previous report.
    #[allow(clippy::too_many_arguments)]
    pub fn send(
        &mut self,
        stack: &mut impl UsbDeviceStack,
        buttons: Buttons,
        trigger_left: u8,
        trigger_right: u8,
        left_x: i16,
        left_y: i16,
        right_x: i16,
        right_y: i16,
    ) -> bool {
        if self.personality != Personality::Controller {
            return false;
        }

        // The populate step always completes, independent of whether the
        // transmission below goes out.
        self.report = XinputReport {
            buttons,
            trigger_left,
            trigger_right,
            stick_left_x: left_x,
            stick_left_y: left_y,
            stick_right_x: right_x,
            stick_right_y: right_y,
        };

        if stack.is_suspended() {
            stack.remote_wakeup();
        }

        if !stack.is_configured() || stack.endpoint_busy(XINPUT_EP_IN) {
            return false;
        }

        if !stack.endpoint_claim(XINPUT_EP_IN) {
            return false;
        }
        let accepted = stack.endpoint_submit(XINPUT_EP_IN, &self.report.to_bytes());
        stack.endpoint_release(XINPUT_EP_IN);
        accepted
    }

    /// Last populated report (for diagnostics and tests).
    #[must_use]
    pub fn report(&self) -> &XinputReport {
        &self.report
    }
}
