//! Recording transport for tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use g15_core::TransportError;

use crate::transport::{HidDeviceInfo, Session, Transport};

/// Scripted outcome of one `read_timeout` call
pub enum MockRead {
    Report(Vec<u8>),
    Timeout,
    Error(TransportError),
}

#[derive(Default)]
pub struct MockBus {
    pub devices: Vec<HidDeviceInfo>,
    pub enumerate_error: Option<TransportError>,
    pub fail_open: HashSet<String>,
    pub write_error: Option<TransportError>,
    /// Accept only this many bytes per write
    pub short_write: Option<usize>,
    pub reads: HashMap<String, VecDeque<MockRead>>,

    pub opened: Vec<String>,
    pub closed: Vec<String>,
    pub writes: Vec<(String, Vec<u8>)>,
    pub read_paths: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    pub bus: Rc<RefCell<MockBus>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&self, path: &str, vendor_id: u16, product_id: u16, interface_number: i32) {
        self.add_collection(path, vendor_id, product_id, interface_number, (0, 0));
    }

    /// Add an entry that also reports its top-level collection usage
    pub fn add_collection(
        &self,
        path: &str,
        vendor_id: u16,
        product_id: u16,
        interface_number: i32,
        (usage_page, usage): (u16, u16),
    ) {
        self.bus.borrow_mut().devices.push(HidDeviceInfo {
            path: path.into(),
            vendor_id,
            product_id,
            interface_number,
            usage_page,
            usage,
        });
    }

    pub fn queue_read(&self, path: &str, read: MockRead) {
        self.bus
            .borrow_mut()
            .reads
            .entry(path.into())
            .or_default()
            .push_back(read);
    }

    pub fn fail_open(&self, path: &str) {
        self.bus.borrow_mut().fail_open.insert(path.into());
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.bus.borrow().writes.clone()
    }

    /// Number of write and read calls that reached a session
    pub fn io_calls(&self) -> usize {
        let bus = self.bus.borrow();
        bus.writes.len() + bus.read_paths.len()
    }
}

pub struct MockSession {
    path: String,
    bus: Rc<RefCell<MockBus>>,
}

impl Transport for MockTransport {
    type Session = MockSession;

    fn enumerate(
        &self,
        vendor_id: Option<u16>,
        product_id: Option<u16>,
    ) -> Result<Vec<HidDeviceInfo>, TransportError> {
        let bus = self.bus.borrow();
        if let Some(e) = &bus.enumerate_error {
            return Err(e.clone());
        }
        Ok(bus
            .devices
            .iter()
            .filter(|d| {
                vendor_id.is_none_or(|v| d.vendor_id == v)
                    && product_id.is_none_or(|p| d.product_id == p)
            })
            .cloned()
            .collect())
    }

    fn open(&self, path: &str) -> Result<MockSession, TransportError> {
        let mut bus = self.bus.borrow_mut();
        if bus.fail_open.contains(path) {
            return Err(TransportError::PermissionDenied(path.into()));
        }
        bus.opened.push(path.into());
        Ok(MockSession {
            path: path.into(),
            bus: self.bus.clone(),
        })
    }
}

impl Session for MockSession {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut bus = self.bus.borrow_mut();
        if let Some(e) = &bus.write_error {
            return Err(e.clone());
        }
        bus.writes.push((self.path.clone(), data.to_vec()));
        Ok(bus.short_write.map_or(data.len(), |n| n.min(data.len())))
    }

    fn read_timeout(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize, TransportError> {
        let mut bus = self.bus.borrow_mut();
        bus.read_paths.push(self.path.clone());
        let next = bus.reads.get_mut(&self.path).and_then(VecDeque::pop_front);
        match next {
            Some(MockRead::Report(report)) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            },
            Some(MockRead::Error(e)) => Err(e),
            Some(MockRead::Timeout) | None => Ok(0),
        }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.bus.borrow_mut().closed.push(self.path.clone());
    }
}
