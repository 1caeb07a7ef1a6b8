//! Core types for the g15 device interface.
//!
//! This crate provides:
//! - The `Capabilities` bitfield that gates every device operation
//! - The static table of supported models (`DEVICES`) and id lookup
//! - The normalized `PressedKeys` set, `Leds` mask and level enums
//! - The `G15Error` / `TransportError` taxonomy

mod caps;
mod device;
mod error;
mod keys;

pub use caps::Capabilities;
pub use device::{
    find_descriptor, find_descriptor_in, DeviceDescriptor, DEVICES, LOGITECH_VENDOR_ID,
};
pub use error::{G15Error, Result, TransportError};
pub use keys::{Brightness, Contrast, Leds, PressedKeys};
