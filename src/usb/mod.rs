//! USB device subsystem - binds the core to the ESP32-S3 USB-OTG
//! peripheral through Embassy.
//!
//! The boot personality decides what gets built:
//!
//! - Controller: one vendor interface (FF/5D/01) with the 17-byte vendor
//!   sub-block and two interrupt endpoints; reports flow through a
//!   one-deep channel so the control loop never blocks.
//! - Serial upload: the stack's stock CDC-ACM class.

pub mod device;
