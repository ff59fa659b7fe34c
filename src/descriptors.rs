//! USB enumeration descriptors for both personalities.
//!
//! These are immutable literal tables; the only computation on them is a
//! stateless selection keyed on the active [`Personality`] and the
//! on-demand UTF-16 re-encoding of the string descriptors. The controller
//! tables reproduce a real Xbox 360 wired controller exactly - Windows
//! matches the XInput driver on the vendor class triple and the 17-byte
//! vendor sub-block, and any deviation fails silently with no driver
//! bound. The serial-upload tables are the stock CDC-ACM layout the
//! generic virtual-serial driver expects.
//!
//! Hand-maintained literals are easy to get wrong, so the self-declared
//! length fields are checked against the actual byte counts in the test
//! suite rather than trusted.

use heapless::Vec;

use crate::config::{self, STRING_DESC_MAX_CHARS};
use crate::personality::Personality;

/// Encoded string descriptor: length byte + type byte + up to 31 UTF-16
/// code units.
pub type StringDescriptor = Vec<u8, { 2 + 2 * STRING_DESC_MAX_CHARS }>;

/// Descriptor type byte for string descriptors.
const DESC_TYPE_STRING: u8 = 0x03;

// Controller personality (XInput)

/// Device descriptor: vendor-specific class FF/FF/FF so the host binds
/// the XInput driver instead of generic HID.
pub const XINPUT_DEVICE_DESCRIPTOR: [u8; 18] = [
    0x12, // bLength
    0x01, // bDescriptorType (Device)
    0x00, 0x02, // bcdUSB 2.00
    0xFF, // bDeviceClass (vendor specific)
    0xFF, // bDeviceSubClass
    0xFF, // bDeviceProtocol
    config::EP0_PACKET_SIZE, // bMaxPacketSize0
    0x5E, 0x04, // idVendor (Microsoft)
    0x8E, 0x02, // idProduct (Xbox 360 controller)
    0x14, 0x01, // bcdDevice 1.14
    0x01, // iManufacturer
    0x02, // iProduct
    0x03, // iSerialNumber
    0x01, // bNumConfigurations
];

/// Configuration descriptor tree: one vendor interface, the 17-byte
/// vendor sub-block, and the two interrupt endpoints.
/// Total = 9 + 9 + 17 + 7 + 7 = 49 bytes.
pub const XINPUT_CONFIG_DESCRIPTOR: [u8; 49] = [
    // Configuration
    0x09, 0x02, //
    0x31, 0x00, // wTotalLength (49)
    0x01, // bNumInterfaces
    0x01, // bConfigurationValue
    0x00, // iConfiguration
    0xA0, // bmAttributes (bus-powered, remote wakeup)
    0xFA, // bMaxPower (500 mA)
    //
    // Interface 0: control data
    0x09, 0x04, //
    0x00, // bInterfaceNumber
    0x00, // bAlternateSetting
    0x02, // bNumEndpoints
    0xFF, // bInterfaceClass (vendor specific)
    0x5D, // bInterfaceSubClass
    0x01, // bInterfaceProtocol
    0x00, // iInterface
    //
    // Vendor-specific sub-block (real Xbox 360 values, 17 bytes)
    0x11, 0x21, //
    0x00, 0x01, 0x01, 0x25, //
    0x81, // bEndpointAddress (IN, 1)
    0x14, // bMaxDataSize (20)
    0x00, 0x00, 0x00, 0x00, 0x13, //
    0x01, // bEndpointAddress (OUT, 1)
    0x08, // bMaxDataSize (8)
    0x00, 0x00, //
    //
    // Endpoint 1 IN: state reports
    0x07, 0x05, //
    0x81, // bEndpointAddress
    0x03, // bmAttributes (interrupt)
    0x20, 0x00, // wMaxPacketSize (32)
    0x04, // bInterval (4 ms)
    //
    // Endpoint 1 OUT: rumble/LED
    0x07, 0x05, //
    0x01, // bEndpointAddress
    0x03, // bmAttributes (interrupt)
    0x20, 0x00, // wMaxPacketSize (32)
    0x08, // bInterval (8 ms)
];

/// The vendor sub-block on its own, for stacks that build the interface
/// descriptor themselves and only need the class-specific extra bytes.
pub const XINPUT_VENDOR_BLOCK: [u8; config::XINPUT_VENDOR_BLOCK_LEN] = [
    0x11, 0x21, 0x00, 0x01, 0x01, 0x25, 0x81, 0x14, 0x00, 0x00, 0x00, 0x00, 0x13, 0x01, 0x08,
    0x00, 0x00,
];

/// Human-readable strings, ordered by string-descriptor index (from 1).
const XINPUT_STRINGS: [&str; 3] = [
    config::USB_MANUFACTURER,
    config::USB_PRODUCT,
    config::USB_SERIAL_NUMBER,
];

// Serial-upload personality (CDC-ACM)

/// Device descriptor: miscellaneous/IAD composite so the host loads its
/// generic virtual-serial driver.
pub const CDC_DEVICE_DESCRIPTOR: [u8; 18] = [
    0x12, // bLength
    0x01, // bDescriptorType (Device)
    0x00, 0x02, // bcdUSB 2.00
    0xEF, // bDeviceClass (miscellaneous)
    0x02, // bDeviceSubClass (common class)
    0x01, // bDeviceProtocol (IAD)
    config::EP0_PACKET_SIZE, // bMaxPacketSize0
    0x3A, 0x30, // idVendor (Espressif)
    0x01, 0x10, // idProduct (ESP32-S3 generic)
    0x00, 0x01, // bcdDevice 1.00
    0x01, // iManufacturer
    0x02, // iProduct
    0x03, // iSerialNumber
    0x01, // bNumConfigurations
];

/// Standard two-interface CDC-ACM configuration: IAD, control interface
/// with its functional descriptors and notification endpoint, then the
/// bulk data interface. Total = 9 + 8 + 9 + 5 + 5 + 4 + 5 + 7 + 9 + 7 + 7
/// = 75 bytes.
pub const CDC_CONFIG_DESCRIPTOR: [u8; 75] = [
    // Configuration
    0x09, 0x02, //
    0x4B, 0x00, // wTotalLength (75)
    0x02, // bNumInterfaces
    0x01, // bConfigurationValue
    0x00, // iConfiguration
    0x80, // bmAttributes (bus-powered)
    0xFA, // bMaxPower (500 mA)
    //
    // Interface association: interfaces 0..2 form one CDC function
    0x08, 0x0B, //
    0x00, // bFirstInterface
    0x02, // bInterfaceCount
    0x02, // bFunctionClass (CDC)
    0x02, // bFunctionSubClass (ACM)
    0x00, // bFunctionProtocol
    0x00, // iFunction
    //
    // Interface 0: CDC control
    0x09, 0x04, //
    0x00, // bInterfaceNumber
    0x00, // bAlternateSetting
    0x01, // bNumEndpoints
    0x02, // bInterfaceClass (CDC)
    0x02, // bInterfaceSubClass (ACM)
    0x00, // bInterfaceProtocol
    0x04, // iInterface ("CDC Serial")
    //
    // Header functional, bcdCDC 1.20
    0x05, 0x24, 0x00, 0x20, 0x01, //
    // Call management functional: no call mgmt, data interface 1
    0x05, 0x24, 0x01, 0x00, 0x01, //
    // ACM functional: line coding + send break
    0x04, 0x24, 0x02, 0x06, //
    // Union functional: control 0, subordinate 1
    0x05, 0x24, 0x06, 0x00, 0x01, //
    //
    // Notification endpoint
    0x07, 0x05, //
    0x81, // bEndpointAddress (IN, 1)
    0x03, // bmAttributes (interrupt)
    0x08, 0x00, // wMaxPacketSize (8)
    0x10, // bInterval (16 ms)
    //
    // Interface 1: CDC data
    0x09, 0x04, //
    0x01, // bInterfaceNumber
    0x00, // bAlternateSetting
    0x02, // bNumEndpoints
    0x0A, // bInterfaceClass (CDC data)
    0x00, // bInterfaceSubClass
    0x00, // bInterfaceProtocol
    0x00, // iInterface
    //
    // Data OUT endpoint
    0x07, 0x05, //
    0x02, // bEndpointAddress (OUT, 2)
    0x02, // bmAttributes (bulk)
    0x40, 0x00, // wMaxPacketSize (64)
    0x00, // bInterval
    //
    // Data IN endpoint
    0x07, 0x05, //
    0x82, // bEndpointAddress (IN, 2)
    0x02, // bmAttributes (bulk)
    0x40, 0x00, // wMaxPacketSize (64)
    0x00, // bInterval
];

/// Strings for the upload personality; one extra entry names the CDC
/// interface.
const CDC_STRINGS: [&str; 4] = [
    config::USB_MANUFACTURER,
    config::USB_PRODUCT_CDC,
    config::USB_SERIAL_NUMBER,
    config::USB_CDC_INTERFACE_NAME,
];

// Selection

/// Device descriptor for the active personality.
#[must_use]
pub fn device_descriptor(personality: Personality) -> &'static [u8] {
    match personality {
        Personality::Controller => &XINPUT_DEVICE_DESCRIPTOR,
        Personality::SerialUpload => &CDC_DEVICE_DESCRIPTOR,
    }
}

/// Configuration descriptor for the active personality.
///
/// Only one configuration exists, so `index` is accepted and ignored the
/// way the host's GET_DESCRIPTOR machinery expects.
#[must_use]
pub fn configuration_descriptor(personality: Personality, _index: u8) -> &'static [u8] {
    match personality {
        Personality::Controller => &XINPUT_CONFIG_DESCRIPTOR,
        Personality::SerialUpload => &CDC_CONFIG_DESCRIPTOR,
    }
}

/// String descriptor in wire format, or `None` for an out-of-range index.
///
/// Index 0 is the supported-language list. `langid` is accepted but not
/// used for selection - English (US) is the only language. Strings longer
/// than 31 characters are truncated.
#[must_use]
pub fn string_descriptor(
    personality: Personality,
    index: u8,
    _langid: u16,
) -> Option<StringDescriptor> {
    if index == 0 {
        let mut out = StringDescriptor::new();
        let _ = out.push(4);
        let _ = out.push(DESC_TYPE_STRING);
        let _ = out.extend_from_slice(&config::USB_LANG_ID.to_le_bytes());
        return Some(out);
    }

    let table: &[&str] = match personality {
        Personality::Controller => &XINPUT_STRINGS,
        Personality::SerialUpload => &CDC_STRINGS,
    };
    let s = table.get(usize::from(index) - 1)?;
    Some(encode_string(s))
}

/// Widen an ASCII string to the UTF-16LE string-descriptor wire shape.
fn encode_string(s: &str) -> StringDescriptor {
    let mut out = StringDescriptor::new();
    let chars = s.len().min(STRING_DESC_MAX_CHARS);
    let _ = out.push((2 + 2 * chars) as u8);
    let _ = out.push(DESC_TYPE_STRING);
    for byte in s.bytes().take(chars) {
        let _ = out.push(byte);
        let _ = out.push(0x00);
    }
    out
}

/// Descriptor source capability consumed by the underlying USB device
/// stack.
///
/// The stack is handed one implementation at initialization; which bytes
/// come back is fixed for the lifetime of the enumeration because the
/// personality is read once per boot.
pub trait DescriptorSource {
    fn device_descriptor(&self) -> &'static [u8];
    fn configuration_descriptor(&self, index: u8) -> &'static [u8];
    fn string_descriptor(&self, index: u8, langid: u16) -> Option<StringDescriptor>;
}

/// The descriptor source for this device: a pure selection over the
/// personality captured at boot.
#[derive(Clone, Copy, Debug)]
pub struct PersonalityDescriptors {
    personality: Personality,
}

impl PersonalityDescriptors {
    #[must_use]
    pub const fn new(personality: Personality) -> Self {
        Self { personality }
    }
}

impl DescriptorSource for PersonalityDescriptors {
    fn device_descriptor(&self) -> &'static [u8] {
        device_descriptor(self.personality)
    }

    fn configuration_descriptor(&self, index: u8) -> &'static [u8] {
        configuration_descriptor(self.personality, index)
    }

    fn string_descriptor(&self, index: u8, langid: u16) -> Option<StringDescriptor> {
        string_descriptor(self.personality, index, langid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn device_descriptors_declare_their_own_length() {
        for desc in [&XINPUT_DEVICE_DESCRIPTOR, &CDC_DEVICE_DESCRIPTOR] {
            assert_eq!(desc[0] as usize, desc.len());
            assert_eq!(desc[1], 0x01);
        }
    }

    #[test]
    fn config_descriptors_declare_their_own_total_length() {
        for desc in [&XINPUT_CONFIG_DESCRIPTOR[..], &CDC_CONFIG_DESCRIPTOR[..]] {
            let declared = u16::from_le_bytes([desc[2], desc[3]]) as usize;
            assert_eq!(declared, desc.len());
        }
    }

    #[test]
    fn identities_match_config_constants() {
        let vid = u16::from_le_bytes([XINPUT_DEVICE_DESCRIPTOR[8], XINPUT_DEVICE_DESCRIPTOR[9]]);
        let pid = u16::from_le_bytes([XINPUT_DEVICE_DESCRIPTOR[10], XINPUT_DEVICE_DESCRIPTOR[11]]);
        assert_eq!(vid, config::XINPUT_VID);
        assert_eq!(pid, config::XINPUT_PID);

        let vid = u16::from_le_bytes([CDC_DEVICE_DESCRIPTOR[8], CDC_DEVICE_DESCRIPTOR[9]]);
        let pid = u16::from_le_bytes([CDC_DEVICE_DESCRIPTOR[10], CDC_DEVICE_DESCRIPTOR[11]]);
        assert_eq!(vid, config::CDC_VID);
        assert_eq!(pid, config::CDC_PID);
    }

    #[test]
    fn vendor_block_matches_embedded_copy() {
        // The standalone block must stay in sync with the bytes inside the
        // full configuration tree (offset 18 = 9 config + 9 interface).
        assert_eq!(&XINPUT_CONFIG_DESCRIPTOR[18..18 + 17], &XINPUT_VENDOR_BLOCK);
        assert_eq!(XINPUT_VENDOR_BLOCK[0] as usize, XINPUT_VENDOR_BLOCK.len());
    }

    #[test]
    fn language_list_ignores_requested_langid() {
        for langid in [0x0409, 0x0000, 0xFFFF] {
            let desc = string_descriptor(Personality::Controller, 0, langid).unwrap();
            assert_eq!(&desc[..], &[0x04, 0x03, 0x09, 0x04]);
        }
    }

    #[test]
    fn string_indices_map_per_personality() {
        // Controller has 3 strings (indices 1..=3); upload adds a 4th.
        assert!(string_descriptor(Personality::Controller, 3, 0x0409).is_some());
        assert!(string_descriptor(Personality::Controller, 4, 0x0409).is_none());
        assert!(string_descriptor(Personality::SerialUpload, 4, 0x0409).is_some());
        assert!(string_descriptor(Personality::SerialUpload, 5, 0x0409).is_none());
    }

    #[test]
    fn string_encoding_is_utf16le() {
        let desc = string_descriptor(Personality::Controller, 3, 0x0409).unwrap();
        // "0000001": 2 + 7*2 = 16 bytes
        assert_eq!(desc[0], 16);
        assert_eq!(desc[1], 0x03);
        assert_eq!(&desc[2..6], &[b'0', 0x00, b'0', 0x00]);
        assert_eq!(desc.len(), 16);
    }

    #[test]
    fn overlong_string_truncates_to_31_chars() {
        let desc = encode_string("abcdefghijklmnopqrstuvwxyz0123456789");
        assert_eq!(desc[0] as usize, 2 + 2 * 31);
        assert_eq!(desc.len(), 2 + 2 * 31);
        // Last encoded character is the 31st input character.
        assert_eq!(desc[2 + 2 * 30], b'4');
    }

    #[test]
    fn provider_branches_on_personality() {
        let controller = PersonalityDescriptors::new(Personality::Controller);
        let upload = PersonalityDescriptors::new(Personality::SerialUpload);
        assert_eq!(controller.device_descriptor()[4], 0xFF);
        assert_eq!(upload.device_descriptor()[4], 0xEF);
        assert_eq!(controller.configuration_descriptor(0).len(), 49);
        assert_eq!(upload.configuration_descriptor(0).len(), 75);
    }
}
