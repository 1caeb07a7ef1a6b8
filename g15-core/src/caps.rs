//! Capability flags describing what a device model supports.

use bitflags::bitflags;

bitflags! {
    /// Capability bitfield for a supported device.
    ///
    /// Bit positions are stable; they match the values reported by
    /// [`crate::DeviceDescriptor::capabilities`] and are safe to persist or
    /// compare across versions.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// 160x43 monochrome LCD
        const LCD                = 1 << 0;
        /// Colour LCD (not driven by this crate yet)
        const RGB_LCD            = 1 << 1;
        /// Programmable macro keys
        const KEYS               = 1 << 2;
        /// M1/M2/M3/MR keys with status LEDs
        const MKEYS              = 1 << 3;
        /// Keyboard backlight level control
        const BACKLIGHT_CNTL     = 1 << 4;
        /// Red/blue backlight balance
        const RED_BLUE_BKLT_CNTL = 1 << 5;
        /// Free RGB backlight colour
        const RGB_BKLT_CNTL      = 1 << 6;
        /// LCD contrast control
        const CONTRAST_CNTL      = 1 << 7;
        /// Key reports arrive as 5 byte reports
        const FIVE_BYTE_RETURN   = 1 << 8;
        /// Keys are reported on a second HID interface
        const DUAL_ENDPOINT      = 1 << 9;
        /// G19 colour LCD
        const G19_LCD            = 1 << 10;
        /// G13 gameboard, overrides key decoding and some commands
        const IS_G13             = 1 << 11;
    }
}
