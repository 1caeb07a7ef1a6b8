//! Find attached devices and bind them to the device table.

use std::collections::{HashMap, VecDeque};

use g15_core::{find_descriptor_in, Capabilities, DeviceDescriptor, G15Error, Result, DEVICES};
use tracing::info;

use crate::config::Config;
use crate::interface::G15Interface;
use crate::transport::{HidApiTransport, HidDeviceInfo, Transport};

/// USB interface of the LCD / command endpoint on dual endpoint boards
const COMMAND_INTERFACE: i32 = 0;
/// USB interface carrying the keys on dual endpoint boards
const KEY_INTERFACE: i32 = 1;

/// Vendor collection (usage page, usage) carrying the LCD and LED reports
const COMMAND_USAGE: (u16, u16) = (0xFF00, 0x0001);
/// Vendor collection (usage page, usage) carrying the key reports
const KEY_USAGE: (u16, u16) = (0xFF00, 0x0003);

/// Role of one enumerated HID entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Command,
    Keys,
}

/// Discover every supported device on the system hidapi context
pub fn discover_all(config: &Config) -> Result<Vec<G15Interface<HidApiTransport>>> {
    let transport = HidApiTransport::new().map_err(G15Error::OpenFailed)?;
    discover(&transport, config)
}

/// Discover every supported device visible to `transport`
pub fn discover<T: Transport + Clone>(
    transport: &T,
    config: &Config,
) -> Result<Vec<G15Interface<T>>> {
    discover_in(transport, config, DEVICES)
}

/// Discover devices against an explicit device table.
///
/// Each enumerated HID entry is matched against the first table entry with the
/// same usb ids. Matches become unopened interfaces in enumeration order and
/// everything else is skipped. The key endpoints of dual endpoint boards are
/// paired with their command endpoints instead of being returned on their own.
pub fn discover_in<T: Transport + Clone>(
    transport: &T,
    config: &Config,
    table: &'static [DeviceDescriptor],
) -> Result<Vec<G15Interface<T>>> {
    let entries = transport
        .enumerate(None, None)
        .map_err(G15Error::OpenFailed)?;

    let matched: Vec<(&HidDeviceInfo, &'static DeviceDescriptor, Endpoint)> = entries
        .iter()
        .filter_map(|e| {
            let descriptor = find_descriptor_in(table, e.vendor_id, e.product_id)?;
            Some((e, descriptor, classify(e, descriptor)?))
        })
        .collect();

    // key endpoints per usb id pair, in enumeration order
    let mut key_paths: HashMap<(u16, u16), VecDeque<String>> = HashMap::new();
    for (entry, _, endpoint) in &matched {
        if *endpoint == Endpoint::Keys {
            key_paths
                .entry((entry.vendor_id, entry.product_id))
                .or_default()
                .push_back(entry.path.clone());
        }
    }

    let mut interfaces = Vec::new();
    for (entry, descriptor, endpoint) in matched {
        if endpoint == Endpoint::Keys {
            continue;
        }
        let key_path = if descriptor.has(Capabilities::DUAL_ENDPOINT) {
            key_paths
                .get_mut(&(entry.vendor_id, entry.product_id))
                .and_then(VecDeque::pop_front)
        } else {
            None
        };

        if config.log_level.info_enabled() {
            info!("found {} at {}", descriptor.name, entry.path);
        }
        let mut interface = G15Interface::new(transport.clone(), config);
        interface.bind(descriptor, entry.path.clone(), key_path);
        interfaces.push(interface);
    }

    Ok(interfaces)
}

/// Decide what an entry of a supported model is used for.
///
/// Single endpoint models use every entry as is. Dual endpoint models are
/// split by USB interface number; when the platform reports a collection
/// usage it must match as well, which drops the extra top-level collections
/// some platforms list per interface. Without an interface number the usage
/// alone decides. `None` means the entry is skipped.
fn classify(entry: &HidDeviceInfo, descriptor: &DeviceDescriptor) -> Option<Endpoint> {
    if !descriptor.has(Capabilities::DUAL_ENDPOINT) {
        return Some(Endpoint::Command);
    }

    let usage_known = entry.usage_page != 0;
    let by_usage = match (entry.usage_page, entry.usage) {
        COMMAND_USAGE => Some(Endpoint::Command),
        KEY_USAGE => Some(Endpoint::Keys),
        _ => None,
    };
    let by_interface = match entry.interface_number {
        COMMAND_INTERFACE => Some(Endpoint::Command),
        KEY_INTERFACE => Some(Endpoint::Keys),
        _ => None,
    };

    match (by_interface, usage_known) {
        (Some(endpoint), false) => Some(endpoint),
        (Some(endpoint), true) => (by_usage == Some(endpoint)).then_some(endpoint),
        (None, true) => by_usage,
        (None, false) => Some(Endpoint::Command),
    }
}
