//! RTC fast RAM backing for the boot flags.
//!
//! On the ESP32-S3, RTC fast memory keeps its contents across software
//! resets and deep sleep but not across power removal - exactly the
//! lifetime the personality decision needs. `persistent` placement
//! excludes the words from the runtime's zero-initialization, so after a
//! cold boot they hold arbitrary bits and the guard check in
//! [`BootFlags`] resolves them to the controller personality.
//!
//! Access is boot-time and UI-gesture only; there is no concurrent
//! writer.

use esp_hal::ram;

use crate::personality::BootFlags;

#[ram(rtc_fast, persistent)]
static mut BOOT_MAGIC: u32 = 0;

#[ram(rtc_fast, persistent)]
static mut BOOT_UPLOAD: u32 = 0;

/// The once-per-boot read of the persisted flags.
pub fn boot_flags() -> BootFlags {
    unsafe {
        BootFlags::new(
            core::ptr::read_volatile(core::ptr::addr_of!(BOOT_MAGIC)),
            core::ptr::read_volatile(core::ptr::addr_of!(BOOT_UPLOAD)),
        )
    }
}

fn store(flags: BootFlags) {
    unsafe {
        core::ptr::write_volatile(core::ptr::addr_of_mut!(BOOT_MAGIC), flags.magic);
        core::ptr::write_volatile(core::ptr::addr_of_mut!(BOOT_UPLOAD), flags.upload);
    }
}

/// True if the persisted flags request the serial-upload personality.
pub fn is_upload_mode() -> bool {
    boot_flags().is_upload_mode()
}

/// Arm the serial-upload personality for the next boot.
pub fn enter_upload_mode() {
    let mut flags = boot_flags();
    flags.enter_upload_mode();
    store(flags);
}

/// Return to the controller personality on the next boot.
pub fn exit_upload_mode() {
    let mut flags = boot_flags();
    flags.exit_upload_mode();
    store(flags);
}
