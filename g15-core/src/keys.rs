//! Logical key set, LED mask and level types.

use bitflags::bitflags;

bitflags! {
    /// Normalized set of pressed keys, one bit per logical key.
    ///
    /// Every key report format decodes into this layout, so callers never
    /// see the model specific report bits.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PressedKeys: u64 {
        const G1  = 1 << 0;
        const G2  = 1 << 1;
        const G3  = 1 << 2;
        const G4  = 1 << 3;
        const G5  = 1 << 4;
        const G6  = 1 << 5;
        const G7  = 1 << 6;
        const G8  = 1 << 7;
        const G9  = 1 << 8;
        const G10 = 1 << 9;
        const G11 = 1 << 10;
        const G12 = 1 << 11;
        const G13 = 1 << 12;
        const G14 = 1 << 13;
        const G15 = 1 << 14;
        const G16 = 1 << 15;
        const G17 = 1 << 16;
        const G18 = 1 << 17;
        const G19 = 1 << 18;
        const G20 = 1 << 19;
        const G21 = 1 << 20;
        const G22 = 1 << 21;

        const M1 = 1 << 22;
        const M2 = 1 << 23;
        const M3 = 1 << 24;
        const MR = 1 << 25;

        const L1 = 1 << 26;
        const L2 = 1 << 27;
        const L3 = 1 << 28;
        const L4 = 1 << 29;
        const L5 = 1 << 30;

        /// The light key itself
        const LIGHT_ON  = 1 << 31;
        /// Backlight switched off (reported as a state bit by the G13)
        const LIGHT_OFF = 1 << 32;

        const PLAY     = 1 << 33;
        const STOP     = 1 << 34;
        const REW      = 1 << 35;
        const FWD      = 1 << 36;
        const VOL_UP   = 1 << 37;
        const VOL_DOWN = 1 << 38;
    }
}

impl PressedKeys {
    /// Macro key `G{n}` for n in 1..=22
    pub fn g(n: u8) -> Option<Self> {
        (1..=22)
            .contains(&n)
            .then(|| Self::from_bits_truncate(1 << (n - 1)))
    }

    /// Soft key `L{n}` for n in 1..=5
    pub fn l(n: u8) -> Option<Self> {
        (1..=5)
            .contains(&n)
            .then(|| Self::from_bits_truncate(1 << (n + 25)))
    }
}

bitflags! {
    /// Mode key status LEDs
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Leds: u8 {
        const M1 = 1 << 3;
        const M2 = 1 << 2;
        const M3 = 1 << 1;
        const MR = 1 << 0;
    }
}

/// LCD backlight levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Brightness {
    Dark = 0,
    Medium = 1,
    Bright = 2,
}

impl TryFrom<u8> for Brightness {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Dark),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Bright),
            other => Err(other),
        }
    }
}

/// LCD contrast levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Contrast {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Contrast {
    /// Raw contrast register value understood by the LCD controller
    pub const fn register_value(self) -> u8 {
        match self {
            Self::Low => 18,
            Self::Medium => 22,
            Self::High => 26,
        }
    }
}

impl TryFrom<u8> for Contrast {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(other),
        }
    }
}
