//! Embassy USB-OTG port of the [`UsbDeviceStack`] boundary.
//!
//! Initialises the USB stack for whichever personality was read at boot
//! and exposes the pieces the tasks in `main.rs` need. The non-blocking
//! `send` contract is preserved by putting a one-deep report channel
//! between the control loop and the endpoint writer task: "endpoint
//! busy" is the channel being full, and a submit is the non-blocking
//! `try_send`.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State as CdcState};
use embassy_usb::{Builder, Config, UsbDevice};
use esp_hal::otg_fs::asynch::{Config as OtgConfig, Driver};
use esp_hal::otg_fs::Usb;
use static_cell::StaticCell;

use crate::config;
use crate::descriptors::XINPUT_VENDOR_BLOCK;
use crate::driver::UsbDeviceStack;
use crate::personality::Personality;
use crate::report::XINPUT_REPORT_SIZE;

pub type UsbOtgDriver = Driver<'static>;
pub type EndpointIn = <UsbOtgDriver as embassy_usb::driver::Driver<'static>>::EndpointIn;
pub type EndpointOut = <UsbOtgDriver as embassy_usb::driver::Driver<'static>>::EndpointOut;

static EP_OUT_BUFFER: StaticCell<[u8; 1024]> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 64]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 64]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_BUS_HANDLER: StaticCell<BusStateHandler> = StaticCell::new();
static CDC_STATE: StaticCell<CdcState> = StaticCell::new();

/// Host has finished SET_CONFIGURATION.
static CONFIGURED: AtomicBool = AtomicBool::new(false);
/// Bus is suspended.
static SUSPENDED: AtomicBool = AtomicBool::new(false);
/// Momentary endpoint claim taken by `send`.
static EP_IN_CLAIMED: AtomicBool = AtomicBool::new(false);
/// A suspended `send` asked for a remote wakeup.
static WAKE_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// One report deep: a full channel is exactly "previous transfer still
/// outstanding".
static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, [u8; XINPUT_REPORT_SIZE], 1> =
    Channel::new();

struct BusStateHandler;

impl embassy_usb::Handler for BusStateHandler {
    fn configured(&mut self, configured: bool) {
        CONFIGURED.store(configured, Ordering::Release);
    }

    fn suspended(&mut self, suspended: bool) {
        SUSPENDED.store(suspended, Ordering::Release);
    }

    fn reset(&mut self) {
        CONFIGURED.store(false, Ordering::Release);
    }
}

/// [`UsbDeviceStack`] implementation over the Embassy port.
///
/// Endpoint opening is handled by the stack itself during
/// SET_CONFIGURATION, so `endpoint_open` only acknowledges.
pub struct EmbassyUsbStack;

impl UsbDeviceStack for EmbassyUsbStack {
    fn is_configured(&self) -> bool {
        CONFIGURED.load(Ordering::Acquire)
    }

    fn is_suspended(&self) -> bool {
        SUSPENDED.load(Ordering::Acquire)
    }

    fn remote_wakeup(&mut self) {
        WAKE_REQUEST.signal(());
    }

    fn endpoint_open(&mut self, _descriptor: &[u8]) -> bool {
        true
    }

    fn endpoint_busy(&self, _ep_addr: u8) -> bool {
        REPORT_CHANNEL.is_full()
    }

    fn endpoint_claim(&mut self, _ep_addr: u8) -> bool {
        EP_IN_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn endpoint_submit(&mut self, _ep_addr: u8, data: &[u8]) -> bool {
        let mut report = [0u8; XINPUT_REPORT_SIZE];
        if data.len() != XINPUT_REPORT_SIZE {
            return false;
        }
        report.copy_from_slice(data);
        REPORT_CHANNEL.try_send(report).is_ok()
    }

    fn endpoint_release(&mut self, _ep_addr: u8) {
        EP_IN_CLAIMED.store(false, Ordering::Release);
    }
}

/// Everything `main` needs for the controller personality.
pub struct ControllerUsb {
    pub device: UsbDevice<'static, UsbOtgDriver>,
    pub ep_in: EndpointIn,
    pub ep_out: EndpointOut,
}

/// Everything `main` needs for the serial-upload personality.
pub struct SerialUploadUsb {
    pub device: UsbDevice<'static, UsbOtgDriver>,
    pub cdc: CdcAcmClass<'static, UsbOtgDriver>,
}

pub enum PersonalityUsb {
    Controller(ControllerUsb),
    SerialUpload(SerialUploadUsb),
}

/// Initialise the USB stack for the given boot personality.
///
/// Must be called exactly once; all static buffers are consumed here.
pub fn init(usb: Usb<'static>, personality: Personality) -> PersonalityUsb {
    let otg_config = OtgConfig::default();
    let driver = Driver::new(usb, EP_OUT_BUFFER.init([0; 1024]), otg_config);

    let usb_config = match personality {
        Personality::Controller => {
            let mut c = Config::new(config::XINPUT_VID, config::XINPUT_PID);
            c.device_class = 0xFF;
            c.device_sub_class = 0xFF;
            c.device_protocol = 0xFF;
            c.device_release = config::XINPUT_BCD_DEVICE;
            c.product = Some(config::USB_PRODUCT);
            c.supports_remote_wakeup = true;
            c
        }
        Personality::SerialUpload => {
            let mut c = Config::new(config::CDC_VID, config::CDC_PID);
            // Miscellaneous/IAD composite, as the CDC class expects.
            c.device_class = 0xEF;
            c.device_sub_class = 0x02;
            c.device_protocol = 0x01;
            c.composite_with_iads = true;
            c.product = Some(config::USB_PRODUCT_CDC);
            c
        }
    };
    let mut usb_config = usb_config;
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_packet_size_0 = config::EP0_PACKET_SIZE;
    usb_config.max_power = config::USB_MAX_POWER_MA;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0; 256]),
        USB_BOS_DESC.init([0; 64]),
        USB_MSOS_DESC.init([0; 64]),
        USB_CTRL_BUF.init([0; 128]),
    );
    builder.handler(USB_BUS_HANDLER.init(BusStateHandler));

    match personality {
        Personality::Controller => {
            // One vendor interface with the 17-byte sub-block between the
            // interface and endpoint descriptors, exactly as on the real
            // controller.
            let mut function = builder.function(0xFF, 0x5D, 0x01);
            let mut interface = function.interface();
            let mut alt = interface.alt_setting(0xFF, 0x5D, 0x01, None);
            alt.descriptor(XINPUT_VENDOR_BLOCK[1], &XINPUT_VENDOR_BLOCK[2..]);
            let ep_in = alt.endpoint_interrupt_in(
                config::XINPUT_EP_PACKET_SIZE,
                config::XINPUT_EP_IN_POLL_MS,
            );
            let ep_out = alt.endpoint_interrupt_out(
                config::XINPUT_EP_PACKET_SIZE,
                config::XINPUT_EP_OUT_POLL_MS,
            );
            drop(function);

            let device = builder.build();
            defmt::info!("USB initialised: XInput controller personality");
            PersonalityUsb::Controller(ControllerUsb { device, ep_in, ep_out })
        }
        Personality::SerialUpload => {
            let cdc = CdcAcmClass::new(&mut builder, CDC_STATE.init(CdcState::new()), 64);
            let device = builder.build();
            defmt::info!("USB initialised: CDC serial-upload personality");
            PersonalityUsb::SerialUpload(SerialUploadUsb { device, cdc })
        }
    }
}

/// Run the USB device stack - must be spawned as a dedicated task.
///
/// Handles enumeration and suspend/resume; when the bus is suspended and
/// a `send` has asked for a wake, nudges the host once (best-effort) and
/// goes back to waiting.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbOtgDriver>) -> ! {
    loop {
        device.run_until_suspend().await;
        match select(device.wait_resume(), WAKE_REQUEST.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                if device.remote_wakeup().await.is_err() {
                    defmt::warn!("remote wakeup rejected");
                }
            }
        }
    }
}

/// Drain the report channel onto the interrupt IN endpoint.
pub async fn xinput_writer(mut ep_in: EndpointIn) -> ! {
    use embassy_usb::driver::{Endpoint as _, EndpointIn as _};

    loop {
        ep_in.wait_enabled().await;
        defmt::info!("XInput IN endpoint enabled");
        loop {
            let report = REPORT_CHANNEL.receive().await;
            if ep_in.write(&report).await.is_err() {
                // Endpoint disabled (bus reset); drop the report and wait
                // for the host to reconfigure us.
                break;
            }
        }
    }
}

/// Accept and discard host OUT traffic (rumble/LED packets).
pub async fn xinput_reader(mut ep_out: EndpointOut) -> ! {
    use embassy_usb::driver::{Endpoint as _, EndpointOut as _};

    let mut buf = [0u8; config::XINPUT_EP_PACKET_SIZE as usize];
    loop {
        ep_out.wait_enabled().await;
        while ep_out.read(&mut buf).await.is_ok() {}
    }
}
