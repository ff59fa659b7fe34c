//! solpad - dual-personality USB device front-end.
//!
//! The Ojo del Sol handheld enumerates as one of two mutually exclusive
//! USB identities, decided once per boot:
//!
//! - **Controller**: a byte-exact Xbox 360 wired controller. Vendor-class
//!   descriptors (not standard HID) make Windows bind the XInput driver.
//! - **Serial upload**: a plain CDC-ACM serial port for firmware
//!   maintenance, reached by arming a reset-surviving flag and rebooting.
//!
//! The crate splits into a host-testable core and a feature-gated
//! embedded layer:
//!
//! - [`personality`]: the reset-surviving boot flags and the once-per-boot
//!   personality read
//! - [`descriptors`]: enumeration descriptor tables for both identities
//! - [`driver`]: the vendor class participant and the
//!   [`UsbDeviceStack`](driver::UsbDeviceStack) boundary trait
//! - [`report`] / [`gamepad`]: the 20-byte state report and the
//!   non-blocking send path
//! - `rtc`, `usb` (feature `embedded`): ESP32-S3 bindings - RTC fast RAM
//!   boot flags and the Embassy USB-OTG port
//!
//! Everything in the core is pure logic over those boundaries, so the
//! default build runs the whole test suite on the host.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod descriptors;
pub mod driver;
pub mod error;
pub mod gamepad;
pub mod personality;
pub mod report;

#[cfg(feature = "embedded")]
pub mod rtc;
#[cfg(feature = "embedded")]
pub mod usb;

pub use descriptors::{DescriptorSource, PersonalityDescriptors};
pub use driver::{UsbDeviceStack, XinputClassDriver};
pub use error::OpenError;
pub use gamepad::XinputGamepad;
pub use personality::{BootFlags, Personality};
pub use report::{Buttons, XinputReport, XINPUT_REPORT_SIZE};
