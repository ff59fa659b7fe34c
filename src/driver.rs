//! Vendor-class driver for the controller personality.
//!
//! The XInput protocol has no control-transfer handshake: once the host
//! has opened the two interrupt endpoints the session consists purely of
//! state reports. The driver therefore only has to claim its endpoints
//! during configuration and acknowledge everything else.
//!
//! The driver participates in enumeration only when the boot personality
//! is the controller; in upload mode the stack's built-in CDC-ACM class
//! handles the session and [`XinputClassDriver::registered`] reports
//! nothing to register.

use crate::error::OpenError;
use crate::personality::Personality;

/// Boundary to the underlying USB device stack.
///
/// The core is single-threaded and interrupt-driven: every operation here
/// is a non-blocking best-effort attempt, and none of them may wait. Host
/// tests substitute a mock; the embedded build binds this to the hardware
/// stack.
pub trait UsbDeviceStack {
    /// Host has configured the device (enumeration finished).
    fn is_configured(&self) -> bool;

    /// Bus is currently suspended.
    fn is_suspended(&self) -> bool;

    /// Ask a suspended host to resume. Best-effort: returns without
    /// waiting for the resume to happen.
    fn remote_wakeup(&mut self);

    /// Open an endpoint from its 7-byte endpoint descriptor. False means
    /// enumeration cannot proceed.
    fn endpoint_open(&mut self, descriptor: &[u8]) -> bool;

    /// An earlier transfer on this endpoint is still outstanding.
    fn endpoint_busy(&self, ep_addr: u8) -> bool;

    /// Take momentary exclusive ownership of the endpoint. Not
    /// reentrant-safe; callers pair every successful claim with a
    /// release.
    fn endpoint_claim(&mut self, ep_addr: u8) -> bool;

    /// Submit one transfer. Fire-and-forget: completion is internal to
    /// the stack and only observable as the endpoint going non-busy.
    fn endpoint_submit(&mut self, ep_addr: u8, data: &[u8]) -> bool;

    /// Give up the claim taken by [`endpoint_claim`].
    ///
    /// [`endpoint_claim`]: UsbDeviceStack::endpoint_claim
    fn endpoint_release(&mut self, ep_addr: u8);
}

/// Descriptor stream framing: offset of the length byte in any
/// descriptor, and the endpoint descriptor type tag.
const DESC_OFFSET_LEN: usize = 0;
const DESC_OFFSET_TYPE: usize = 1;
const DESC_TYPE_ENDPOINT: u8 = 0x05;

const INTERFACE_DESC_LEN: usize = 9;
const ENDPOINT_DESC_LEN: usize = 7;

/// The near-no-op vendor class participant.
///
/// Stateless: everything the driver needs lives in the descriptor stream
/// the stack hands to [`open`](Self::open).
#[derive(Clone, Copy, Debug, Default)]
pub struct XinputClassDriver;

impl XinputClassDriver {
    pub const fn new() -> Self {
        Self
    }

    /// How many class drivers to register for the given boot personality.
    ///
    /// The CDC personality runs entirely on the stack's built-in serial
    /// class, so this driver steps aside.
    #[must_use]
    pub fn registered(personality: Personality) -> usize {
        match personality {
            Personality::Controller => 1,
            Personality::SerialUpload => 0,
        }
    }

    /// Claim the interface: called by the stack during SET_CONFIGURATION
    /// with the descriptor stream positioned at our interface descriptor.
    ///
    /// Walks the stream opening every endpoint the interface declares and
    /// returns the number of bytes consumed (interface + vendor sub-block
    /// + endpoint descriptors). Errors are fatal to enumeration.
    pub fn open(
        &mut self,
        stack: &mut impl UsbDeviceStack,
        descriptors: &[u8],
        max_len: usize,
    ) -> Result<usize, OpenError> {
        if descriptors.len() < INTERFACE_DESC_LEN {
            return Err(OpenError::Truncated);
        }
        let num_endpoints = usize::from(descriptors[4]);

        let drv_len = INTERFACE_DESC_LEN
            + num_endpoints * ENDPOINT_DESC_LEN
            + crate::config::XINPUT_VENDOR_BLOCK_LEN;
        if max_len < drv_len || descriptors.len() < drv_len {
            return Err(OpenError::Capacity);
        }

        let mut offset = INTERFACE_DESC_LEN;
        let mut found = 0;
        while found < num_endpoints {
            let desc = &descriptors[offset..];
            if desc.len() < 2 || desc[DESC_OFFSET_LEN] == 0 {
                return Err(OpenError::Truncated);
            }
            let len = usize::from(desc[DESC_OFFSET_LEN]);
            if desc.len() < len {
                return Err(OpenError::Truncated);
            }
            if desc[DESC_OFFSET_TYPE] == DESC_TYPE_ENDPOINT {
                if !stack.endpoint_open(&desc[..len]) {
                    return Err(OpenError::Endpoint);
                }
                found += 1;
            }
            offset += len;
        }

        Ok(drv_len)
    }

    /// Bus reset: nothing to clear.
    pub fn reset(&mut self) {}

    /// The protocol defines no control-transfer handshake; acknowledge
    /// unconditionally.
    #[must_use]
    pub fn control_transfer(&mut self) -> bool {
        true
    }

    /// Per-transfer completion: nothing beyond what the endpoint
    /// machinery already guarantees.
    #[must_use]
    pub fn transfer_complete(&mut self, _ep_addr: u8, _len: usize) -> bool {
        true
    }
}
