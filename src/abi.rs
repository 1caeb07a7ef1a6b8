//! Fixed-format output reports for LEDs, backlight, contrast and reset.

use g15_core::{Brightness, Contrast, Leds};

/// A typed report field and its wire encoding
pub trait ReportField {
    /// Bytes taken in the report
    const WIDTH: usize;
    /// Encode into `out`, which is exactly `WIDTH` bytes long
    fn encode_into(&self, out: &mut [u8]);
}

impl ReportField for u8 {
    const WIDTH: usize = 1;
    fn encode_into(&self, out: &mut [u8]) {
        out[0] = *self;
    }
}

impl ReportField for Brightness {
    const WIDTH: usize = 1;
    fn encode_into(&self, out: &mut [u8]) {
        out[0] = *self as u8;
    }
}

impl ReportField for Contrast {
    const WIDTH: usize = 1;
    fn encode_into(&self, out: &mut [u8]) {
        out[0] = self.register_value();
    }
}

impl ReportField for Leds {
    const WIDTH: usize = 1;
    fn encode_into(&self, out: &mut [u8]) {
        out[0] = self.bits();
    }
}

macro_rules! impl_report_abi {
    [$(
        $( #[doc = $( $doc:tt )* ] )*
        fn $name:ident ( [ $( $hardcode:expr ),* ] $(, $arg:ident: $type:tt )* ) -> [u8; $len:literal];
    )+] => {
        $(
            $(#[doc = concat!("Construct a report for ", $($doc)*)])*
            #[allow(unused_mut, unused_variables, unused_assignments)]
            pub fn $name( $( $arg: $type ),* ) -> [u8; $len] {
                const { assert!(0 $( + $hardcode - $hardcode + 1 )* $( + <$type as ReportField>::WIDTH )* <= $len) };
                let mut buf = [0u8; $len];
                let mut cur = 0;
                $(
                    buf[cur] = $hardcode;
                    cur += 1;
                )*
                $(
                    let start = cur;
                    cur += <$type as ReportField>::WIDTH;
                    $arg.encode_into(&mut buf[start..cur]);
                )*
                buf
            }
        )*
    };
}

impl_report_abi![
    /* LEVELS */

    /// setting the keyboard backlight level
    fn kb_brightness([0x02, 0x01], level: Brightness) -> [u8; 4];

    /// setting the lcd backlight level, pre-shifted into the high nibble
    fn lcd_brightness_raw([0x02, 0x02], level: u8) -> [u8; 4];

    /// setting the lcd contrast
    fn lcd_contrast([0x02, 0x20, 0x81], level: Contrast) -> [u8; 4];

    /* MODE KEY LEDS */

    /// setting the mode key leds on the G15 and G11, active low
    fn mkey_leds_inverted([0x02, 0x04], leds: u8) -> [u8; 4];

    /// setting the mode key leds on dual endpoint boards
    fn mkey_leds_dual([0x04], leds: Leds) -> [u8; 2];

    /// setting the mode key leds on the G13
    fn mkey_leds_g13([0x05], leds: Leds) -> [u8; 5];

    /* BACKLIGHT COLOUR */

    /// setting the rgb backlight colour
    fn backlight_color([0x05], red: u8, green: u8, blue: u8) -> [u8; 4];

    /// setting the G13 rgb backlight colour
    fn backlight_color_g13([0x07], red: u8, green: u8, blue: u8) -> [u8; 5];

    /* CONTROL */

    /// the soft reset
    fn reset([0x02, 0x00]) -> [u8; 4];
];

/// Construct a report for setting the lcd backlight level
pub fn lcd_brightness(level: Brightness) -> [u8; 4] {
    lcd_brightness_raw((level as u8) << 4)
}

/// Construct a report for setting the mode key leds on the G15 and G11
pub fn mkey_leds(leds: Leds) -> [u8; 4] {
    mkey_leds_inverted(!leds.bits() & Leds::all().bits())
}
