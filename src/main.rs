//! solpad firmware entry point (ESP32-S3).
//!
//! Reads the boot personality once from RTC fast RAM, brings up the
//! matching USB identity, and runs the per-frame control loop. Holding
//! the boot button toggles the personality for the next boot and resets.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Ticker};
use esp_backtrace as _;
use esp_hal::gpio::{Input, Pull};
use esp_hal::otg_fs::Usb;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;

use solpad::config::UPLOAD_HOLD_MS;
use solpad::usb::device::{self, EmbassyUsbStack, PersonalityUsb, UsbOtgDriver};
use solpad::{rtc, Buttons, XinputGamepad};

/// Control-loop period; matches the IN endpoint's 4 ms polling interval.
const FRAME_MS: u32 = 4;

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, UsbOtgDriver>) -> ! {
    device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn writer_task(ep_in: device::EndpointIn) -> ! {
    device::xinput_writer(ep_in).await
}

#[embassy_executor::task]
async fn reader_task(ep_out: device::EndpointOut) -> ! {
    device::xinput_reader(ep_out).await
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    // The single boot-time read everything branches on.
    let personality = rtc::boot_flags().personality();
    defmt::info!("boot personality: {}", personality);

    let usb = Usb::new(peripherals.USB0, peripherals.GPIO20, peripherals.GPIO19);
    let boot_button = Input::new(peripherals.GPIO0, Pull::Up);

    match device::init(usb, personality) {
        PersonalityUsb::Controller(controller) => {
            spawner.must_spawn(usb_task(controller.device));
            spawner.must_spawn(writer_task(controller.ep_in));
            spawner.must_spawn(reader_task(controller.ep_out));
            controller_loop(boot_button, XinputGamepad::new(personality)).await
        }
        PersonalityUsb::SerialUpload(upload) => {
            spawner.must_spawn(usb_task(upload.device));
            upload_loop(boot_button, upload.cdc).await
        }
    }
}

/// Per-frame control loop for the controller personality.
///
/// State acquisition (sensors, bar thresholds, battery) lives in its own
/// collaborators; until those are wired in, a neutral controller state is
/// reported every frame. A false return from `send` just means "try
/// again next frame".
async fn controller_loop(button: Input<'static>, mut gamepad: XinputGamepad) -> ! {
    let mut stack = EmbassyUsbStack;
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_MS as u64));
    let mut held_ms: u32 = 0;

    loop {
        ticker.next().await;
        let _ = gamepad.send(&mut stack, Buttons::NONE, 0, 0, 0, 0, 0, 0);

        held_ms = if button.is_low() { held_ms + FRAME_MS } else { 0 };
        if held_ms >= UPLOAD_HOLD_MS {
            defmt::info!("boot button held - rebooting into upload mode");
            rtc::enter_upload_mode();
            esp_hal::reset::software_reset();
        }
    }
}

/// Serial-upload personality: the CDC session belongs to the host's
/// flashing tool; we only loop the port back and watch for the exit
/// gesture.
async fn upload_loop(
    button: Input<'static>,
    mut cdc: embassy_usb::class::cdc_acm::CdcAcmClass<'static, UsbOtgDriver>,
) -> ! {
    use embassy_futures::select::{select, Either};

    let mut buf = [0u8; 64];
    loop {
        cdc.wait_connection().await;
        defmt::info!("CDC host connected");

        let mut held_ms: u32 = 0;
        loop {
            let echo = async {
                let n = cdc.read_packet(&mut buf).await?;
                cdc.write_packet(&buf[..n]).await
            };
            match select(echo, embassy_time::Timer::after_millis(u64::from(FRAME_MS))).await {
                Either::First(Err(_)) => break, // disconnected
                Either::First(Ok(())) => {}
                Either::Second(()) => {
                    held_ms = if button.is_low() { held_ms + FRAME_MS } else { 0 };
                    if held_ms >= UPLOAD_HOLD_MS {
                        defmt::info!("boot button held - rebooting into controller mode");
                        rtc::exit_upload_mode();
                        esp_hal::reset::software_reset();
                    }
                }
            }
        }
    }
}
