//! Established timing bitmaps (base block bytes 0x23..0x25 and the ETIII descriptor).
//!
//! Both bitmaps are stored most significant byte first, so flag `n` of the
//! published bit order is bit `N - 1 - n` of the integer. Unnamed bits are
//! retained so they round-trip.

use bitflags::bitflags;

bitflags! {
    /// Legacy modes advertised in the base block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EstablishedTimings: u32 {
        const MODE_720X400_70 = 1 << 23;
        const MODE_720X400_88 = 1 << 22;
        const MODE_640X480_60 = 1 << 21;
        const MODE_640X480_67 = 1 << 20;
        const MODE_640X480_72 = 1 << 19;
        const MODE_640X480_75 = 1 << 18;
        const MODE_800X600_56 = 1 << 17;
        const MODE_800X600_60 = 1 << 16;

        const MODE_800X600_72 = 1 << 15;
        const MODE_800X600_75 = 1 << 14;
        const MODE_832X624_75 = 1 << 13;
        const MODE_1024X768_87I = 1 << 12;
        const MODE_1024X768_60 = 1 << 11;
        const MODE_1024X768_70 = 1 << 10;
        const MODE_1024X768_75 = 1 << 9;
        const MODE_1280X1024_75 = 1 << 8;

        const MODE_1152X870_75 = 1 << 7;
        const MANUFACTURER_6 = 1 << 6;
        const MANUFACTURER_5 = 1 << 5;
        const MANUFACTURER_4 = 1 << 4;
        const MANUFACTURER_3 = 1 << 3;
        const MANUFACTURER_2 = 1 << 2;
        const MANUFACTURER_1 = 1 << 1;
        const MANUFACTURER_0 = 1 << 0;
    }
}

impl EstablishedTimings {
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_bits_retain(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    pub fn to_bytes(self) -> [u8; 3] {
        let b = self.bits().to_be_bytes();
        [b[1], b[2], b[3]]
    }
}

/// Mode labels of the base-block bitmap, in published bit order.
pub const ESTABLISHED_MODES: [&str; 17] = [
    "720 x 400 @ 70",
    "720 x 400 @ 88",
    "640 x 480 @ 60",
    "640 x 480 @ 67",
    "640 x 480 @ 72",
    "640 x 480 @ 75",
    "800 x 600 @ 56",
    "800 x 600 @ 60",
    "800 x 600 @ 72",
    "800 x 600 @ 75",
    "832 x 624 @ 75",
    "1024 x 768 @ 87i",
    "1024 x 768 @ 60",
    "1024 x 768 @ 70",
    "1024 x 768 @ 75",
    "1280 x 1024 @ 75",
    "1152 x 870 @ 75",
];

bitflags! {
    /// Modes of the established timings III descriptor (bytes 6..11).
    ///
    /// The low 4 bits of the last byte are reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EstablishedTimings3: u64 {
        const MODE_640X350_85 = 1 << 47;
        const MODE_640X400_85 = 1 << 46;
        const MODE_720X400_85 = 1 << 45;
        const MODE_640X480_85 = 1 << 44;
        const MODE_848X480_60 = 1 << 43;
        const MODE_800X600_85 = 1 << 42;
        const MODE_1024X768_85 = 1 << 41;
        const MODE_1152X864_75 = 1 << 40;

        const MODE_1280X768_60RB = 1 << 39;
        const MODE_1280X768_60 = 1 << 38;
        const MODE_1280X768_75 = 1 << 37;
        const MODE_1280X768_85 = 1 << 36;
        const MODE_1280X960_60 = 1 << 35;
        const MODE_1280X960_85 = 1 << 34;
        const MODE_1280X1024_60 = 1 << 33;
        const MODE_1280X1024_85 = 1 << 32;

        const MODE_1360X768_60 = 1 << 31;
        const MODE_1440X900_60RB = 1 << 30;
        const MODE_1440X900_60 = 1 << 29;
        const MODE_1440X900_75 = 1 << 28;
        const MODE_1440X900_85 = 1 << 27;
        const MODE_1400X1050_60RB = 1 << 26;
        const MODE_1400X1050_60 = 1 << 25;
        const MODE_1400X1050_75 = 1 << 24;

        const MODE_1400X1050_85 = 1 << 23;
        const MODE_1680X1050_60RB = 1 << 22;
        const MODE_1680X1050_60 = 1 << 21;
        const MODE_1680X1050_75 = 1 << 20;
        const MODE_1680X1050_85 = 1 << 19;
        const MODE_1600X1200_60 = 1 << 18;
        const MODE_1600X1200_65 = 1 << 17;
        const MODE_1600X1200_70 = 1 << 16;

        const MODE_1600X1200_75 = 1 << 15;
        const MODE_1600X1200_85 = 1 << 14;
        const MODE_1792X1344_60 = 1 << 13;
        const MODE_1792X1344_75 = 1 << 12;
        const MODE_1856X1392_60 = 1 << 11;
        const MODE_1856X1392_75 = 1 << 10;
        const MODE_1920X1200_60RB = 1 << 9;
        const MODE_1920X1200_60 = 1 << 8;

        const MODE_1920X1200_75 = 1 << 7;
        const MODE_1920X1200_85 = 1 << 6;
        const MODE_1920X1440_60 = 1 << 5;
        const MODE_1920X1440_75 = 1 << 4;
    }
}

impl EstablishedTimings3 {
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        let mut raw = [0u8; 8];
        raw[2..].copy_from_slice(&bytes);
        Self::from_bits_retain(u64::from_be_bytes(raw))
    }

    pub fn to_bytes(self) -> [u8; 6] {
        let raw = self.bits().to_be_bytes();
        let mut out = [0u8; 6];
        out.copy_from_slice(&raw[2..]);
        out
    }

    /// Reserved low bits of the last byte.
    pub fn reserved(self) -> u8 {
        (self.bits() & 0x0f) as u8
    }
}

/// Mode labels of the ETIII bitmap, in published bit order.
pub const ESTABLISHED_III_MODES: [&str; 44] = [
    "640 x 350 @ 85",
    "640 x 400 @ 85",
    "720 x 400 @ 85",
    "640 x 480 @ 85",
    "848 x 480 @ 60",
    "800 x 600 @ 85",
    "1024 x 768 @ 85",
    "1152 x 864 @ 75",
    "1280 x 768 @ 60rb",
    "1280 x 768 @ 60",
    "1280 x 768 @ 75",
    "1280 x 768 @ 85",
    "1280 x 960 @ 60",
    "1280 x 960 @ 85",
    "1280 x 1024 @ 60",
    "1280 x 1024 @ 85",
    "1360 x 768 @ 60",
    "1440 x 900 @ 60rb",
    "1440 x 900 @ 60",
    "1440 x 900 @ 75",
    "1440 x 900 @ 85",
    "1400 x 1050 @ 60rb",
    "1400 x 1050 @ 60",
    "1400 x 1050 @ 75",
    "1400 x 1050 @ 85",
    "1680 x 1050 @ 60rb",
    "1680 x 1050 @ 60",
    "1680 x 1050 @ 75",
    "1680 x 1050 @ 85",
    "1600 x 1200 @ 60",
    "1600 x 1200 @ 65",
    "1600 x 1200 @ 70",
    "1600 x 1200 @ 75",
    "1600 x 1200 @ 85",
    "1792 x 1344 @ 60",
    "1792 x 1344 @ 75",
    "1856 x 1392 @ 60",
    "1856 x 1392 @ 75",
    "1920 x 1200 @ 60rb",
    "1920 x 1200 @ 60",
    "1920 x 1200 @ 75",
    "1920 x 1200 @ 85",
    "1920 x 1440 @ 60",
    "1920 x 1440 @ 75",
];

/// Labels of the modes set in the base-block bitmap.
pub fn established_labels(timings: EstablishedTimings) -> Vec<&'static str> {
    labels(timings.bits() as u64, 24, &ESTABLISHED_MODES)
}

/// Labels of the modes set in an ETIII bitmap.
pub fn established_iii_labels(timings: EstablishedTimings3) -> Vec<&'static str> {
    labels(timings.bits(), 48, &ESTABLISHED_III_MODES)
}

fn labels(bits: u64, width: u32, names: &[&'static str]) -> Vec<&'static str> {
    names
        .iter()
        .enumerate()
        .filter(|(i, _)| bits & (1 << (width - 1 - *i as u32)) != 0)
        .map(|(_, name)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_bitmap_bit_order() {
        let et = EstablishedTimings::from_bytes([0x21, 0x08, 0x00]);
        assert!(et.contains(EstablishedTimings::MODE_640X480_60));
        assert!(et.contains(EstablishedTimings::MODE_800X600_60));
        assert!(et.contains(EstablishedTimings::MODE_1024X768_60));
        assert_eq!(
            established_labels(et),
            vec!["640 x 480 @ 60", "800 x 600 @ 60", "1024 x 768 @ 60"]
        );
        assert_eq!(et.to_bytes(), [0x21, 0x08, 0x00]);
    }

    #[test]
    fn test_manufacturer_bits_retained() {
        let et = EstablishedTimings::from_bytes([0x00, 0x00, 0x7F]);
        assert!(et.contains(EstablishedTimings::MANUFACTURER_6));
        assert!(et.contains(EstablishedTimings::MANUFACTURER_0));
        assert!(established_labels(et).is_empty());
        assert_eq!(et.to_bytes(), [0x00, 0x00, 0x7F]);
    }

    #[test]
    fn test_etiii_bit_order_and_reserved() {
        let bytes = [0x80, 0x00, 0x00, 0x00, 0x00, 0x1A];
        let et = EstablishedTimings3::from_bytes(bytes);
        assert!(et.contains(EstablishedTimings3::MODE_640X350_85));
        assert!(et.contains(EstablishedTimings3::MODE_1920X1440_75));
        assert_eq!(et.reserved(), 0x0A);
        assert_eq!(
            established_iii_labels(et),
            vec!["640 x 350 @ 85", "1920 x 1440 @ 75"]
        );
        assert_eq!(et.to_bytes(), bytes);
    }
}
