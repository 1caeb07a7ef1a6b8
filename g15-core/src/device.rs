//! Supported device table and lookup.

use crate::Capabilities;

/// Logitech USB vendor id
pub const LOGITECH_VENDOR_ID: u16 = 0x046d;

/// Static information about a supported device model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Human readable model name, also the key callers use to find the device again
    pub name: &'static str,
    pub vendor_id: u16,
    pub product_id: u16,
    pub capabilities: Capabilities,
}

impl DeviceDescriptor {
    pub const fn new(
        name: &'static str,
        vendor_id: u16,
        product_id: u16,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            name,
            vendor_id,
            product_id,
            capabilities,
        }
    }

    /// Check if this descriptor describes the given usb ids
    #[inline(always)]
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    /// Check a capability flag (or set of flags) on this model
    #[inline(always)]
    pub fn has(&self, caps: Capabilities) -> bool {
        self.capabilities.contains(caps)
    }
}

const fn caps(bits: u32) -> Capabilities {
    Capabilities::from_bits_truncate(bits)
}

const LCD: u32 = Capabilities::LCD.bits();
const RGB_LCD: u32 = Capabilities::RGB_LCD.bits();
const KEYS: u32 = Capabilities::KEYS.bits();
const MKEYS: u32 = Capabilities::MKEYS.bits();
const BACKLIGHT: u32 = Capabilities::BACKLIGHT_CNTL.bits();
const RED_BLUE: u32 = Capabilities::RED_BLUE_BKLT_CNTL.bits();
const RGB_BKLT: u32 = Capabilities::RGB_BKLT_CNTL.bits();
const CONTRAST: u32 = Capabilities::CONTRAST_CNTL.bits();
const FIVE_BYTE: u32 = Capabilities::FIVE_BYTE_RETURN.bits();
const DUAL: u32 = Capabilities::DUAL_ENDPOINT.bits();
const G19_LCD: u32 = Capabilities::G19_LCD.bits();
const G13: u32 = Capabilities::IS_G13.bits();

/// Every supported model, in match priority order.
///
/// Lookup returns the first entry with matching ids, so when two entries share
/// ids the earlier declaration wins.
pub static DEVICES: &[DeviceDescriptor] = &[
    DeviceDescriptor::new(
        "Logitech G15",
        LOGITECH_VENDOR_ID,
        0xc222,
        caps(LCD | KEYS | MKEYS | BACKLIGHT | CONTRAST),
    ),
    DeviceDescriptor::new(
        "Logitech G11",
        LOGITECH_VENDOR_ID,
        0xc225,
        caps(KEYS | MKEYS | BACKLIGHT),
    ),
    DeviceDescriptor::new("Logitech Z-10", LOGITECH_VENDOR_ID, 0x0a07, caps(LCD)),
    DeviceDescriptor::new(
        "Logitech G15 v2",
        LOGITECH_VENDOR_ID,
        0xc227,
        caps(LCD | KEYS | MKEYS | BACKLIGHT | FIVE_BYTE),
    ),
    DeviceDescriptor::new("Logitech Gamepanel", LOGITECH_VENDOR_ID, 0xc251, caps(LCD)),
    DeviceDescriptor::new(
        "Logitech G13",
        LOGITECH_VENDOR_ID,
        0xc21c,
        caps(LCD | KEYS | MKEYS | RGB_BKLT | G13),
    ),
    DeviceDescriptor::new(
        "Logitech G510",
        LOGITECH_VENDOR_ID,
        0xc22d,
        caps(LCD | KEYS | MKEYS | BACKLIGHT | RGB_BKLT | DUAL),
    ),
    DeviceDescriptor::new(
        "Logitech G510 (audio)",
        LOGITECH_VENDOR_ID,
        0xc22e,
        caps(LCD | KEYS | MKEYS | BACKLIGHT | RGB_BKLT | DUAL),
    ),
    DeviceDescriptor::new(
        "Logitech G110",
        LOGITECH_VENDOR_ID,
        0xc22b,
        caps(KEYS | MKEYS | BACKLIGHT | RED_BLUE | DUAL),
    ),
    DeviceDescriptor::new(
        "Logitech G19",
        LOGITECH_VENDOR_ID,
        0xc229,
        caps(RGB_LCD | G19_LCD | KEYS | MKEYS | BACKLIGHT | RGB_BKLT | DUAL),
    ),
];

/// Find the first entry of `table` matching the usb ids
pub fn find_descriptor_in(
    table: &'static [DeviceDescriptor],
    vendor_id: u16,
    product_id: u16,
) -> Option<&'static DeviceDescriptor> {
    table.iter().find(|d| d.matches(vendor_id, product_id))
}

/// Find the first supported model matching the usb ids
pub fn find_descriptor(vendor_id: u16, product_id: u16) -> Option<&'static DeviceDescriptor> {
    find_descriptor_in(DEVICES, vendor_id, product_id)
}
