//! Thin transport layer over hidapi.
//!
//! The interface only needs four primitives: enumerate, open, write and a
//! bounded read. They are expressed as the `Transport` and `Session` traits so
//! tests can substitute a recording double for real hardware.

use std::ffi::CString;
use std::sync::{Arc, Mutex, PoisonError};

use g15_core::TransportError;
use hidapi::{HidApi, HidDevice};

/// One enumerated HID interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidDeviceInfo {
    /// Platform path used to open the device
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    /// USB interface number, -1 when the platform does not report it
    pub interface_number: i32,
    /// Top-level collection usage page, 0 when the platform does not report it
    pub usage_page: u16,
    pub usage: u16,
}

/// Device enumeration and opening
pub trait Transport {
    type Session: Session;

    /// List attached HID interfaces, optionally filtered by usb ids
    fn enumerate(
        &self,
        vendor_id: Option<u16>,
        product_id: Option<u16>,
    ) -> Result<Vec<HidDeviceInfo>, TransportError>;

    /// Open the interface at `path`
    fn open(&self, path: &str) -> Result<Self::Session, TransportError>;
}

/// An opened HID interface. Dropping the session closes it.
pub trait Session {
    /// Write one output report, returning the number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Read one input report. Returns `Ok(0)` when the timeout expires first.
    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError>;
}

/// Shared handle to the hidapi context
#[derive(Clone)]
pub struct HidApiTransport {
    api: Arc<Mutex<HidApi>>,
}

impl HidApiTransport {
    /// Initialise hidapi
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            api: Arc::new(Mutex::new(HidApi::new()?)),
        })
    }
}

impl Transport for HidApiTransport {
    type Session = HidDevice;

    fn enumerate(
        &self,
        vendor_id: Option<u16>,
        product_id: Option<u16>,
    ) -> Result<Vec<HidDeviceInfo>, TransportError> {
        let mut api = self.api.lock().unwrap_or_else(PoisonError::into_inner);
        api.refresh_devices()?;
        Ok(api
            .device_list()
            .filter(|d| {
                vendor_id.is_none_or(|v| d.vendor_id() == v)
                    && product_id.is_none_or(|p| d.product_id() == p)
            })
            .map(|d| HidDeviceInfo {
                path: d.path().to_string_lossy().into_owned(),
                vendor_id: d.vendor_id(),
                product_id: d.product_id(),
                interface_number: d.interface_number(),
                usage_page: d.usage_page(),
                usage: d.usage(),
            })
            .collect())
    }

    fn open(&self, path: &str) -> Result<HidDevice, TransportError> {
        let path = CString::new(path)
            .map_err(|_| TransportError::Hid(format!("invalid device path {path:?}")))?;
        let api = self.api.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(api.open_path(&path)?)
    }
}

impl Session for HidDevice {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        Ok(HidDevice::write(self, data)?)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        Ok(HidDevice::read_timeout(self, buf, timeout_ms)?)
    }
}
