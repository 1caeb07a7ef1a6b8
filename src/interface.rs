//! The per-device interface.
//!
//! A [`G15Interface`] owns at most one session to one physical device. It is
//! bound to a [`DeviceDescriptor`] by discovery and consults the descriptor's
//! capability bits before every operation, so one type drives every model.
//!
//! If any operation returns [`G15Error::DeviceGone`], drop the instance, run
//! discovery again and `init` whatever comes back.

use std::time::Duration;

use g15_core::{
    Brightness, Capabilities, Contrast, DeviceDescriptor, G15Error, Leds, PressedKeys, Result,
    TransportError,
};
use tracing::{info, warn};

use crate::abi;
use crate::config::Config;
use crate::decode::{KeyReportFormat, KEY_READ_BUFFER_LEN};
use crate::lcd::{self, LCD_BUFFER_LEN, PIXMAP_LEN};
use crate::logging::LogLevel;
use crate::transport::{HidApiTransport, Session, Transport};

/// Session lifecycle
enum State<S> {
    /// No descriptor yet
    Unbound,
    /// Descriptor known, never opened
    Bound,
    /// Live session. `keys` is the grabbed key endpoint of dual endpoint boards.
    Open { device: S, keys: Option<S> },
    /// Closed by the caller or by device loss; `init` reopens
    Closed,
}

/// High level abstraction over one G15-family device
pub struct G15Interface<T: Transport = HidApiTransport> {
    transport: T,
    descriptor: Option<&'static DeviceDescriptor>,
    dev_path: String,
    key_path: Option<String>,
    format: Option<KeyReportFormat>,
    state: State<T::Session>,
    log: LogLevel,
    key_timeout: Duration,
}

impl<T: Transport> G15Interface<T> {
    /// Create an unbound interface. Use discovery to get bound ones.
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            descriptor: None,
            dev_path: String::new(),
            key_path: None,
            format: None,
            state: State::Unbound,
            log: config.log_level,
            key_timeout: config.key_timeout,
        }
    }

    /// Attach a model and its device paths
    pub(crate) fn bind(
        &mut self,
        descriptor: &'static DeviceDescriptor,
        dev_path: impl Into<String>,
        key_path: Option<String>,
    ) {
        self.descriptor = Some(descriptor);
        self.dev_path = dev_path.into();
        self.key_path = key_path;
        self.format = Some(KeyReportFormat::for_capabilities(descriptor.capabilities));
        self.state = State::Bound;
    }

    /// Change the diagnostic level of this instance
    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log = level;
    }

    /// Open the device.
    ///
    /// Dual endpoint boards also grab their key interface; if that fails the
    /// command session is released again and the whole call fails.
    pub fn init(&mut self) -> Result<()> {
        let descriptor = self.descriptor.ok_or(G15Error::NotBound)?;
        if self.is_inited() {
            return Ok(());
        }

        let device = self.transport.open(&self.dev_path).map_err(|e| {
            if self.log.warn_enabled() {
                warn!("failed to open {} at {}: {e}", descriptor.name, self.dev_path);
            }
            G15Error::OpenFailed(e)
        })?;

        let keys = if descriptor.has(Capabilities::DUAL_ENDPOINT) {
            // `device` is dropped, and so closed, on the error path
            Some(self.grab_input_events()?)
        } else {
            None
        };

        self.state = State::Open { device, keys };
        if self.log.info_enabled() {
            info!("opened {} at {}", descriptor.name, self.dev_path);
        }
        Ok(())
    }

    /// Claim the separate key endpoint
    fn grab_input_events(&self) -> Result<T::Session> {
        let Some(path) = self.key_path.as_deref() else {
            if self.log.warn_enabled() {
                warn!("{} has no key endpoint to grab", self.model_name());
            }
            return Err(G15Error::OpenFailed(TransportError::Hid(
                "no key endpoint found for dual endpoint device".into(),
            )));
        };
        self.transport.open(path).map_err(|e| {
            if self.log.warn_enabled() {
                warn!("failed to grab key endpoint {path}: {e}");
            }
            G15Error::OpenFailed(e)
        })
    }

    /// Whether a session is live
    pub fn is_inited(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    /// Soft reset the device.
    ///
    /// The device may re-enumerate at a different path afterwards, so the
    /// instance should be discarded and discovery run again.
    pub fn reset(&mut self) -> Result<()> {
        self.write_report(&abi::reset(), G15Error::WriteFailed)?;
        if self.log.info_enabled() {
            info!("reset {}", self.model_name());
        }
        Ok(())
    }

    /// Release the session. Needs `init` before the device can be used again.
    pub fn close(&mut self) {
        if let State::Open { .. } = self.state {
            self.state = State::Closed;
            if self.log.info_enabled() {
                info!("closed {}", self.model_name());
            }
        }
    }

    /// Model name from the device table, the handle for finding the device again
    pub fn device_model_name(&self) -> Option<&'static str> {
        self.descriptor.map(|d| d.name)
    }

    /// Capability bits of the bound model, empty while unbound
    pub fn capabilities(&self) -> Capabilities {
        self.descriptor
            .map(|d| d.capabilities)
            .unwrap_or(Capabilities::empty())
    }

    /// Device table entry the interface is bound to
    pub fn descriptor(&self) -> Option<&'static DeviceDescriptor> {
        self.descriptor
    }

    /// Transport path of the command endpoint
    pub fn dev_path(&self) -> &str {
        &self.dev_path
    }

    /// Key report layout selected for the bound model
    pub fn key_report_format(&self) -> Option<KeyReportFormat> {
        self.format
    }

    /// Draw a 160x43 row-major, MSB-first bitmap on the LCD
    pub fn write_mono_pixmap_to_lcd(&mut self, data: &[u8]) -> Result<()> {
        self.require(Capabilities::LCD, "monochrome lcd")?;
        if data.len() != PIXMAP_LEN {
            return Err(G15Error::InvalidPixmap {
                expected: PIXMAP_LEN,
                actual: data.len(),
            });
        }

        let mut buf = [0u8; LCD_BUFFER_LEN];
        lcd::encode_pixmap(data, &mut buf);
        self.write_report(&buf, G15Error::WritingPixmap)
    }

    /// Write a buffer already in the LCD's native layout, header included
    pub fn write_lcd_buffer(&mut self, buffer: &[u8]) -> Result<()> {
        self.require(Capabilities::LCD, "monochrome lcd")?;
        if buffer.len() != LCD_BUFFER_LEN {
            return Err(G15Error::InvalidPixmap {
                expected: LCD_BUFFER_LEN,
                actual: buffer.len(),
            });
        }
        self.write_report(buffer, G15Error::WritingBuffer)
    }

    /// Set the mode key LEDs from a `Leds` bit mask (M1 = 0x8 .. MR = 0x1)
    pub fn set_leds(&mut self, leds: u8) -> Result<()> {
        self.require(Capabilities::MKEYS, "mode key leds")?;
        let leds = Leds::from_bits(leds).ok_or(G15Error::InvalidLevel {
            operation: "mode key leds",
            level: leds.into(),
        })?;

        let caps = self.capabilities();
        if caps.contains(Capabilities::IS_G13) {
            self.write_report(&abi::mkey_leds_g13(leds), G15Error::WriteFailed)
        } else if caps.contains(Capabilities::DUAL_ENDPOINT) {
            self.write_report(&abi::mkey_leds_dual(leds), G15Error::WriteFailed)
        } else {
            self.write_report(&abi::mkey_leds(leds), G15Error::WriteFailed)
        }
    }

    /// Set the LCD backlight level (0 dark, 1 medium, 2 bright)
    pub fn set_lcd_brightness(&mut self, level: u8) -> Result<()> {
        self.require(Capabilities::LCD, "lcd brightness")?;
        let level = Brightness::try_from(level).map_err(|level| G15Error::InvalidLevel {
            operation: "lcd brightness",
            level: level.into(),
        })?;
        self.write_report(&abi::lcd_brightness(level), G15Error::WriteFailed)
    }

    /// Set the LCD contrast (0 low, 1 medium, 2 high)
    pub fn set_lcd_contrast(&mut self, level: u8) -> Result<()> {
        self.require(Capabilities::CONTRAST_CNTL, "lcd contrast")?;
        let level = Contrast::try_from(level).map_err(|level| G15Error::InvalidLevel {
            operation: "lcd contrast",
            level: level.into(),
        })?;
        self.write_report(&abi::lcd_contrast(level), G15Error::WriteFailed)
    }

    /// Set the keyboard backlight level (0 off, 1 medium, 2 bright)
    pub fn set_kb_brightness(&mut self, level: u8) -> Result<()> {
        self.require(Capabilities::BACKLIGHT_CNTL, "keyboard brightness")?;
        let level = Brightness::try_from(level).map_err(|level| G15Error::InvalidLevel {
            operation: "keyboard brightness",
            level: level.into(),
        })?;
        self.write_report(&abi::kb_brightness(level), G15Error::WriteFailed)
    }

    /// Set the backlight colour on RGB backlit models
    pub fn set_rgb_led_color(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        self.require(Capabilities::RGB_BKLT_CNTL, "rgb backlight")?;
        if self.capabilities().contains(Capabilities::IS_G13) {
            self.write_report(
                &abi::backlight_color_g13(red, green, blue),
                G15Error::WriteFailed,
            )
        } else {
            self.write_report(
                &abi::backlight_color(red, green, blue),
                G15Error::WriteFailed,
            )
        }
    }

    /// Wait up to `timeout` for one key report and decode it.
    ///
    /// The hardware sends two reports per key transition and only one of them
    /// carries the key state for a given model. Whichever arrives first is
    /// returned on: the wrong one yields [`G15Error::TryAgain`] and the caller
    /// should read again immediately.
    pub fn get_pressed_keys(&mut self, timeout: Duration) -> Result<PressedKeys> {
        let format = self.format.ok_or(G15Error::NotBound)?;
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        let State::Open { device, keys } = &mut self.state else {
            return Err(G15Error::NotOpen);
        };
        let endpoint = keys.as_mut().unwrap_or(device);

        let mut report = [0u8; KEY_READ_BUFFER_LEN];
        let read = endpoint.read_timeout(&mut report, timeout_ms);
        let len = match read {
            Ok(0) => return Err(G15Error::Timeout),
            Ok(len) => len,
            Err(e) => return Err(self.transport_failure(e, G15Error::ReadFailed)),
        };
        let report = &report[..len];

        match format.decode(report) {
            Some(pressed) => {
                if self.log.info_enabled() {
                    info!("key report {report:02x?} -> {pressed:?}");
                }
                Ok(pressed)
            },
            None => {
                if self.log.warn_enabled() {
                    warn!(
                        "ignoring {len} byte report for {format:?} ({} expected): {report:02x?}",
                        format.report_len()
                    );
                }
                Err(G15Error::TryAgain)
            },
        }
    }

    /// [`get_pressed_keys`](Self::get_pressed_keys) with the configured timeout
    pub fn poll_pressed_keys(&mut self) -> Result<PressedKeys> {
        self.get_pressed_keys(self.key_timeout)
    }

    fn model_name(&self) -> &'static str {
        self.device_model_name().unwrap_or("unbound device")
    }

    /// Fail with `Unsupported` unless the bound model has `caps`
    fn require(&self, caps: Capabilities, operation: &'static str) -> Result<()> {
        let descriptor = self.descriptor.ok_or(G15Error::NotBound)?;
        if descriptor.has(caps) {
            Ok(())
        } else {
            if self.log.warn_enabled() {
                warn!("{operation} is not supported by {}", descriptor.name);
            }
            Err(G15Error::Unsupported {
                model: descriptor.name,
                operation,
            })
        }
    }

    /// Internal method to write one complete report on the command endpoint
    fn write_report(
        &mut self,
        data: &[u8],
        on_error: fn(TransportError) -> G15Error,
    ) -> Result<()> {
        let State::Open { device, .. } = &mut self.state else {
            return Err(G15Error::NotOpen);
        };
        let written = device.write(data);
        match written {
            Ok(n) if n == data.len() => Ok(()),
            Ok(n) => Err(self.transport_failure(
                TransportError::IncompleteWrite {
                    sent: n,
                    all: data.len(),
                },
                on_error,
            )),
            Err(e) => Err(self.transport_failure(e, on_error)),
        }
    }

    /// Map a transport failure, dropping the session if the device is gone
    fn transport_failure(
        &mut self,
        e: TransportError,
        on_error: fn(TransportError) -> G15Error,
    ) -> G15Error {
        if e == TransportError::Disconnected {
            self.state = State::Closed;
            if self.log.warn_enabled() {
                warn!("{} disconnected, rediscovery required", self.model_name());
            }
            G15Error::DeviceGone
        } else {
            if self.log.warn_enabled() {
                warn!("{}: {e}", self.model_name());
            }
            on_error(e)
        }
    }
}
