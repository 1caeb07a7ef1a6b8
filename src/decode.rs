//! Key report decoding.
//!
//! Each model family sends its macro keys in one of five report layouts. The
//! layout is picked once from the capability bits and every report is then
//! translated into the shared [`PressedKeys`] set.

use g15_core::{Capabilities, PressedKeys, PressedKeys as K};

/// Size of the buffer handed to the transport for key reads. Larger than any
/// key report so an oversized report shows up as a length mismatch instead of
/// being silently truncated.
pub const KEY_READ_BUFFER_LEN: usize = 64;

/// Reverse the bit order of a byte (bit 0 <-> bit 7, ...)
#[inline(always)]
pub const fn reverse_bits_in_byte(v: u8) -> u8 {
    v.reverse_bits()
}

/// Key report layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyReportFormat {
    /// G13 gameboard, 8 byte report on the 9 byte read path
    G13,
    /// G15 and G11, 9 byte report
    NineByte,
    /// G15 v2, 5 byte report
    FiveByte,
    /// G510, G110 and G19 key endpoint, 4 byte report. Key and LCD button
    /// reports share the length and differ by report id.
    FourByte,
    /// LCD soft keys and media keys of the Z-10 and Gamepanel
    TwoByte,
}

/// One report bit and the logical key it maps to
#[derive(Debug, Clone, Copy)]
struct KeyBit {
    byte: usize,
    mask: u8,
    key: PressedKeys,
}

const fn bit(byte: usize, mask: u8, key: PressedKeys) -> KeyBit {
    KeyBit { byte, mask, key }
}

const NINE_BYTE_MAP: &[KeyBit] = &[
    bit(1, 0x01, K::G1),
    bit(2, 0x02, K::G2),
    bit(3, 0x04, K::G3),
    bit(4, 0x08, K::G4),
    bit(5, 0x10, K::G5),
    bit(6, 0x20, K::G6),
    bit(2, 0x01, K::G7),
    bit(3, 0x02, K::G8),
    bit(4, 0x04, K::G9),
    bit(5, 0x08, K::G10),
    bit(6, 0x10, K::G11),
    bit(7, 0x20, K::G12),
    bit(1, 0x04, K::G13),
    bit(2, 0x08, K::G14),
    bit(3, 0x10, K::G15),
    bit(4, 0x20, K::G16),
    bit(5, 0x40, K::G17),
    bit(8, 0x40, K::G18),
    bit(6, 0x01, K::M1),
    bit(7, 0x02, K::M2),
    bit(8, 0x04, K::M3),
    bit(7, 0x40, K::MR),
    bit(8, 0x80, K::L1),
    bit(2, 0x80, K::L2),
    bit(3, 0x80, K::L3),
    bit(4, 0x80, K::L4),
    bit(5, 0x80, K::L5),
    bit(1, 0x80, K::LIGHT_ON),
];

// bytes 1 and 2 carry the stick position
const G13_MAP: &[KeyBit] = &[
    bit(3, 0x01, K::G1),
    bit(3, 0x02, K::G2),
    bit(3, 0x04, K::G3),
    bit(3, 0x08, K::G4),
    bit(3, 0x10, K::G5),
    bit(3, 0x20, K::G6),
    bit(3, 0x40, K::G7),
    bit(3, 0x80, K::G8),
    bit(4, 0x01, K::G9),
    bit(4, 0x02, K::G10),
    bit(4, 0x04, K::G11),
    bit(4, 0x08, K::G12),
    bit(4, 0x10, K::G13),
    bit(4, 0x20, K::G14),
    bit(4, 0x40, K::G15),
    bit(4, 0x80, K::G16),
    bit(5, 0x01, K::G17),
    bit(5, 0x02, K::G18),
    bit(5, 0x04, K::G19),
    bit(5, 0x08, K::G20),
    bit(5, 0x10, K::G21),
    bit(5, 0x20, K::G22),
    bit(5, 0x80, K::LIGHT_OFF),
    bit(6, 0x01, K::L1),
    bit(6, 0x02, K::L2),
    bit(6, 0x04, K::L3),
    bit(6, 0x08, K::L4),
    bit(6, 0x10, K::L5),
    bit(6, 0x20, K::M1),
    bit(6, 0x40, K::M2),
    bit(6, 0x80, K::M3),
    bit(7, 0x01, K::MR),
    bit(7, 0x20, K::LIGHT_ON),
];

const FIVE_BYTE_MAP: &[KeyBit] = &[
    bit(1, 0x01, K::G1),
    bit(1, 0x02, K::G2),
    bit(1, 0x04, K::G3),
    bit(1, 0x08, K::G4),
    bit(1, 0x10, K::G5),
    bit(1, 0x20, K::G6),
    bit(1, 0x40, K::M1),
    bit(1, 0x80, K::M2),
    bit(2, 0x01, K::LIGHT_ON),
    bit(2, 0x02, K::L2),
    bit(2, 0x04, K::L3),
    bit(2, 0x08, K::L4),
    bit(2, 0x10, K::L5),
    bit(2, 0x20, K::M3),
    bit(2, 0x40, K::MR),
    bit(2, 0x80, K::L1),
];

const FOUR_BYTE_MAP: &[KeyBit] = &[
    bit(1, 0x01, K::G1),
    bit(1, 0x02, K::G2),
    bit(1, 0x04, K::G3),
    bit(1, 0x08, K::G4),
    bit(1, 0x10, K::G5),
    bit(1, 0x20, K::G6),
    bit(1, 0x40, K::G7),
    bit(1, 0x80, K::G8),
    bit(2, 0x01, K::G9),
    bit(2, 0x02, K::G10),
    bit(2, 0x04, K::G11),
    bit(2, 0x08, K::G12),
    bit(2, 0x10, K::G13),
    bit(2, 0x20, K::G14),
    bit(2, 0x40, K::G15),
    bit(2, 0x80, K::G16),
    bit(3, 0x01, K::G17),
    bit(3, 0x02, K::G18),
    bit(3, 0x04, K::LIGHT_ON),
    bit(3, 0x10, K::M1),
    bit(3, 0x20, K::M2),
    bit(3, 0x40, K::M3),
    bit(3, 0x80, K::MR),
];

// G510 LCD buttons, sent on the key endpoint under report id 0x02
const FOUR_BYTE_SOFT_KEY_MAP: &[KeyBit] = &[
    bit(1, 0x01, K::L1),
    bit(1, 0x02, K::L2),
    bit(1, 0x04, K::L3),
    bit(1, 0x08, K::L4),
    bit(1, 0x10, K::L5),
];

// byte 0 is matched after bit reversal
const TWO_BYTE_MAP: &[KeyBit] = &[
    bit(0, 0x01, K::L1),
    bit(0, 0x02, K::L2),
    bit(0, 0x04, K::L3),
    bit(0, 0x08, K::L4),
    bit(0, 0x10, K::L5),
    bit(0, 0x20, K::LIGHT_ON),
    bit(1, 0x01, K::PLAY),
    bit(1, 0x02, K::STOP),
    bit(1, 0x04, K::REW),
    bit(1, 0x08, K::FWD),
    bit(1, 0x10, K::VOL_UP),
    bit(1, 0x20, K::VOL_DOWN),
];

#[inline(always)]
fn collect(report: &[u8], map: &[KeyBit]) -> PressedKeys {
    map.iter()
        .filter(|b| report[b.byte] & b.mask != 0)
        .fold(PressedKeys::empty(), |keys, b| keys | b.key)
}

fn process_key_event_9byte_g13(report: &[u8; 8]) -> Option<PressedKeys> {
    (report[0] == 0x01).then(|| collect(report, G13_MAP))
}

fn process_key_event_9byte(report: &[u8; 9]) -> Option<PressedKeys> {
    (report[0] == 0x02).then(|| collect(report, NINE_BYTE_MAP))
}

fn process_key_event_5byte(report: &[u8; 5]) -> Option<PressedKeys> {
    (report[0] == 0x02).then(|| collect(report, FIVE_BYTE_MAP))
}

fn process_key_event_4byte(report: &[u8; 4]) -> Option<PressedKeys> {
    match report[0] {
        0x03 => Some(collect(report, FOUR_BYTE_MAP)),
        0x02 => Some(collect(report, FOUR_BYTE_SOFT_KEY_MAP)),
        _ => None,
    }
}

/// Report id and bit map of every report a layout decodes
type ReportMap = (Option<u8>, &'static [KeyBit]);

const G13_REPORTS: &[ReportMap] = &[(Some(0x01), G13_MAP)];
const NINE_BYTE_REPORTS: &[ReportMap] = &[(Some(0x02), NINE_BYTE_MAP)];
const FIVE_BYTE_REPORTS: &[ReportMap] = &[(Some(0x02), FIVE_BYTE_MAP)];
const FOUR_BYTE_REPORTS: &[ReportMap] = &[
    (Some(0x03), FOUR_BYTE_MAP),
    (Some(0x02), FOUR_BYTE_SOFT_KEY_MAP),
];
const TWO_BYTE_REPORTS: &[ReportMap] = &[(None, TWO_BYTE_MAP)];

fn process_key_event_2byte(report: &[u8; 2]) -> Option<PressedKeys> {
    let normalized = [reverse_bits_in_byte(report[0]), report[1]];
    Some(collect(&normalized, TWO_BYTE_MAP))
}

impl KeyReportFormat {
    /// Pick the report layout for a model
    pub fn for_capabilities(caps: Capabilities) -> Self {
        if caps.contains(Capabilities::IS_G13) {
            Self::G13
        } else if caps.contains(Capabilities::FIVE_BYTE_RETURN) {
            Self::FiveByte
        } else if caps.contains(Capabilities::DUAL_ENDPOINT) {
            Self::FourByte
        } else if caps.contains(Capabilities::KEYS) {
            Self::NineByte
        } else {
            Self::TwoByte
        }
    }

    /// Exact length of a valid key report
    pub const fn report_len(self) -> usize {
        match self {
            Self::G13 => 8,
            Self::NineByte => 9,
            Self::FiveByte => 5,
            Self::FourByte => 4,
            Self::TwoByte => 2,
        }
    }

    /// Report id of the main key report in byte 0, if the layout has one.
    ///
    /// `FourByte` also accepts id 0x02, the LCD button report of the G510.
    pub const fn report_id(self) -> Option<u8> {
        match self {
            Self::G13 => Some(0x01),
            Self::NineByte | Self::FiveByte => Some(0x02),
            Self::FourByte => Some(0x03),
            Self::TwoByte => None,
        }
    }

    /// Decode a raw report.
    ///
    /// Returns `None` when the report has the wrong length or report id for
    /// this layout. These are the devices' secondary reports and the caller
    /// should simply read again.
    pub fn decode(self, report: &[u8]) -> Option<PressedKeys> {
        match self {
            Self::G13 => process_key_event_9byte_g13(report.try_into().ok()?),
            Self::NineByte => process_key_event_9byte(report.try_into().ok()?),
            Self::FiveByte => process_key_event_5byte(report.try_into().ok()?),
            Self::FourByte => process_key_event_4byte(report.try_into().ok()?),
            Self::TwoByte => process_key_event_2byte(report.try_into().ok()?),
        }
    }

    /// Every key this layout can report
    pub fn supported_keys(self) -> PressedKeys {
        self.reports()
            .iter()
            .flat_map(|(_, map)| map.iter())
            .fold(PressedKeys::empty(), |keys, b| keys | b.key)
    }

    fn reports(self) -> &'static [ReportMap] {
        match self {
            Self::G13 => G13_REPORTS,
            Self::NineByte => NINE_BYTE_REPORTS,
            Self::FiveByte => FIVE_BYTE_REPORTS,
            Self::FourByte => FOUR_BYTE_REPORTS,
            Self::TwoByte => TWO_BYTE_REPORTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [KeyReportFormat; 5] = [
        KeyReportFormat::G13,
        KeyReportFormat::NineByte,
        KeyReportFormat::FiveByte,
        KeyReportFormat::FourByte,
        KeyReportFormat::TwoByte,
    ];

    fn empty_report(format: KeyReportFormat) -> Vec<u8> {
        let mut report = vec![0u8; format.report_len()];
        if let Some(id) = format.report_id() {
            report[0] = id;
        }
        report
    }

    /// Build the raw report with id `id` that presses exactly `key`
    fn encode(format: KeyReportFormat, id: Option<u8>, key: KeyBit) -> Vec<u8> {
        let mut report = vec![0u8; format.report_len()];
        if let Some(id) = id {
            report[0] = id;
        }
        let mask = match format {
            KeyReportFormat::TwoByte if key.byte == 0 => reverse_bits_in_byte(key.mask),
            _ => key.mask,
        };
        report[key.byte] |= mask;
        report
    }

    #[test]
    fn reverse_bits_fixed_points() {
        assert_eq!(reverse_bits_in_byte(0x00), 0x00);
        assert_eq!(reverse_bits_in_byte(0xFF), 0xFF);
        assert_eq!(reverse_bits_in_byte(0x01), 0x80);
        assert_eq!(reverse_bits_in_byte(0xF0), 0x0F);
        assert_eq!(reverse_bits_in_byte(0b1010_0110), 0b0110_0101);
    }

    #[test]
    fn reverse_bits_is_an_involution() {
        for v in 0..=u8::MAX {
            assert_eq!(reverse_bits_in_byte(reverse_bits_in_byte(v)), v);
        }
    }

    #[test]
    fn empty_reports_decode_to_nothing() {
        for format in ALL_FORMATS {
            assert_eq!(
                format.decode(&empty_report(format)),
                Some(PressedKeys::empty()),
                "{format:?}"
            );
        }
    }

    #[test]
    fn every_mapped_bit_decodes_to_exactly_one_key() {
        for format in ALL_FORMATS {
            for (id, key) in format
                .reports()
                .iter()
                .flat_map(|(id, map)| map.iter().map(move |key| (*id, key)))
            {
                let report = encode(format, id, *key);
                assert_eq!(
                    format.decode(&report),
                    Some(key.key),
                    "{format:?} byte {} mask {:#04x}",
                    key.byte,
                    key.mask
                );
            }
        }
    }

    #[test]
    fn maps_have_no_overlapping_bits_or_keys() {
        for format in ALL_FORMATS {
            for (_, map) in format.reports() {
                for (i, a) in map.iter().enumerate() {
                    assert_eq!(a.mask.count_ones(), 1);
                    assert!(a.byte < format.report_len());
                    for b in &map[i + 1..] {
                        assert!(!(a.byte == b.byte && a.mask == b.mask), "{format:?}");
                    }
                }
            }

            let keys: Vec<PressedKeys> = format
                .reports()
                .iter()
                .flat_map(|(_, map)| map.iter().map(|b| b.key))
                .collect();
            for (i, a) in keys.iter().enumerate() {
                assert!(!keys[i + 1..].contains(a), "{format:?} maps {a:?} twice");
            }
        }
    }

    #[test]
    fn multiple_keys_combine() {
        let report = [0x02, 0x01, 0x01, 0, 0, 0, 0x01, 0, 0];
        assert_eq!(
            KeyReportFormat::NineByte.decode(&report),
            Some(PressedKeys::G1 | PressedKeys::G7 | PressedKeys::M1)
        );
    }

    #[test]
    fn g13_ignores_stick_axes() {
        let report = [0x01, 0x7f, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            KeyReportFormat::G13.decode(&report),
            Some(PressedKeys::empty())
        );
    }

    #[test]
    fn g510_lcd_buttons() {
        let format = KeyReportFormat::FourByte;
        assert_eq!(
            format.decode(&[0x02, 0x05, 0x00, 0x00]),
            Some(PressedKeys::L1 | PressedKeys::L3)
        );
        assert_eq!(
            format.decode(&[0x02, 0x10, 0x00, 0x00]),
            Some(PressedKeys::L5)
        );
        // the button report does not carry G keys
        assert_eq!(
            format.decode(&[0x02, 0x00, 0xff, 0xff]),
            Some(PressedKeys::empty())
        );
        assert_eq!(
            format.decode(&[0x03, 0x01, 0x00, 0x00]),
            Some(PressedKeys::G1)
        );
        assert_eq!(format.decode(&[0x02, 0x01]), None);
    }

    #[test]
    fn two_byte_soft_keys_are_bit_reversed() {
        // L1 is the top bit on the wire
        assert_eq!(
            KeyReportFormat::TwoByte.decode(&[0x80, 0x00]),
            Some(PressedKeys::L1)
        );
        assert_eq!(
            KeyReportFormat::TwoByte.decode(&[0x08, 0x01]),
            Some(PressedKeys::L5 | PressedKeys::PLAY)
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        for format in ALL_FORMATS {
            let mut long = empty_report(format);
            long.push(0);
            assert_eq!(format.decode(&long), None, "{format:?}");
            assert_eq!(format.decode(&long[..format.report_len() - 1]), None);
            assert_eq!(format.decode(&[]), None);
        }
    }

    #[test]
    fn foreign_report_id_is_rejected() {
        // the G15 also sends a 9 byte report with id 0x01
        let report = [0x01, 0xff, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(KeyReportFormat::NineByte.decode(&report), None);
        assert_eq!(KeyReportFormat::FourByte.decode(&[0x01, 0, 0, 0]), None);
    }

    #[test]
    fn format_selection_follows_capabilities() {
        use KeyReportFormat::*;

        let g13 = Capabilities::IS_G13 | Capabilities::KEYS | Capabilities::LCD;
        assert_eq!(KeyReportFormat::for_capabilities(g13), G13);
        let g15v2 = Capabilities::FIVE_BYTE_RETURN | Capabilities::KEYS;
        assert_eq!(KeyReportFormat::for_capabilities(g15v2), FiveByte);
        let g510 = Capabilities::DUAL_ENDPOINT | Capabilities::KEYS;
        assert_eq!(KeyReportFormat::for_capabilities(g510), FourByte);
        assert_eq!(
            KeyReportFormat::for_capabilities(Capabilities::KEYS | Capabilities::MKEYS),
            NineByte
        );
        assert_eq!(
            KeyReportFormat::for_capabilities(Capabilities::LCD),
            TwoByte
        );
    }

    #[test]
    fn every_model_gets_a_format() {
        for device in g15_core::DEVICES {
            let format = KeyReportFormat::for_capabilities(device.capabilities);
            assert!(format.report_len() <= KEY_READ_BUFFER_LEN);
            assert!(!format.supported_keys().is_empty(), "{}", device.name);

            if device.has(Capabilities::LCD | Capabilities::KEYS) {
                let soft_keys = (1..=5).filter_map(PressedKeys::l).collect::<PressedKeys>();
                assert!(
                    format.supported_keys().contains(soft_keys),
                    "{} cannot report its lcd buttons",
                    device.name
                );
            }
        }
    }
}
