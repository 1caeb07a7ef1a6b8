//! High level hidapi abstraction for Logitech G15-family devices
//!
//! Covers the G15 (both revisions), G11, G13, G110, G510, G19 keys and the
//! Z-10 / Gamepanel LCDs: macro key reads, the 160x43 monochrome LCD, mode
//! key LEDs, backlight and contrast levels.
//!
//! ```no_run
//! use g15::{discover_all, Config};
//!
//! let config = Config::load()?;
//! for mut device in discover_all(&config)? {
//!     device.init()?;
//!     device.set_kb_brightness(2)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod abi;
pub mod config;
pub mod decode;
pub mod discovery;
pub mod interface;
pub mod lcd;
pub mod logging;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::{Config, ConfigError};
pub use decode::{reverse_bits_in_byte, KeyReportFormat};
pub use discovery::{discover, discover_all, discover_in};
pub use g15_core::{
    find_descriptor, Brightness, Capabilities, Contrast, DeviceDescriptor, G15Error, Leds,
    PressedKeys, Result, TransportError, DEVICES,
};
pub use interface::G15Interface;
pub use logging::LogLevel;
pub use transport::{HidApiTransport, HidDeviceInfo, Session, Transport};
