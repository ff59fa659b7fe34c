//! Application-wide constants and compile-time configuration.
//!
//! All USB identities, endpoint assignments, timing parameters, and
//! protocol constants live here so they can be tuned in one place.
//!
//! The controller personality must match a real Xbox 360 wired controller
//! byte-for-byte: the host picks its driver purely from these values, and
//! a wrong subclass or vendor-block length fails silently with no driver
//! bound.

// Personality store

/// Guard value marking the boot flags as written by us.
///
/// RTC fast RAM is excluded from zero-initialization, so after a genuine
/// power loss it holds arbitrary bits. Only this exact value makes the
/// stored upload flag trustworthy; anything else resolves to the
/// controller personality.
pub const BOOT_FLAGS_MAGIC: u32 = 0xCDC0_BEEF;

// USB - controller personality (XInput)

/// Microsoft Corp.
pub const XINPUT_VID: u16 = 0x045E;
/// Xbox 360 wired controller.
pub const XINPUT_PID: u16 = 0x028E;
/// bcdDevice of the genuine controller.
pub const XINPUT_BCD_DEVICE: u16 = 0x0114;

/// Interrupt IN endpoint carrying the 20-byte state report.
pub const XINPUT_EP_IN: u8 = 0x81;
/// Interrupt OUT endpoint (rumble/LED data from the host).
pub const XINPUT_EP_OUT: u8 = 0x01;

/// Max packet size of both interrupt endpoints (bytes).
pub const XINPUT_EP_PACKET_SIZE: u16 = 32;
/// IN endpoint polling interval (ms). 4 ms = 250 Hz.
pub const XINPUT_EP_IN_POLL_MS: u8 = 4;
/// OUT endpoint polling interval (ms). 8 ms = 125 Hz.
pub const XINPUT_EP_OUT_POLL_MS: u8 = 8;

/// Length of the vendor-specific sub-block between the interface and
/// endpoint descriptors (bytes).
pub const XINPUT_VENDOR_BLOCK_LEN: usize = 17;

// USB - serial-upload personality (CDC-ACM)

/// Espressif Systems.
pub const CDC_VID: u16 = 0x303A;
/// ESP32-S3 generic CDC device.
pub const CDC_PID: u16 = 0x1001;

/// CDC notification endpoint.
pub const CDC_EP_NOTIF: u8 = 0x81;
/// CDC bulk data endpoints.
pub const CDC_EP_OUT: u8 = 0x02;
pub const CDC_EP_IN: u8 = 0x82;

// USB - shared

/// Control endpoint 0 max packet size (bytes).
pub const EP0_PACKET_SIZE: u8 = 64;

/// Bus power draw declared to the host (mA).
pub const USB_MAX_POWER_MA: u16 = 500;

/// USB device strings (both personalities share manufacturer and serial).
pub const USB_MANUFACTURER: &str = "Ojo del Sol";
pub const USB_PRODUCT: &str = "Ojo del Sol";
pub const USB_PRODUCT_CDC: &str = "Ojo del Sol (CDC)";
pub const USB_SERIAL_NUMBER: &str = "0000001";
pub const USB_CDC_INTERFACE_NAME: &str = "CDC Serial";

/// Supported language: English (US).
pub const USB_LANG_ID: u16 = 0x0409;

// UI

/// Boot-button hold time that toggles the personality for the next boot
/// (ms).
pub const UPLOAD_HOLD_MS: u32 = 3000;

/// Maximum characters of a string descriptor; longer strings are truncated.
pub const STRING_DESC_MAX_CHARS: usize = 31;
