//! 18-byte detailed timing descriptors.

use crate::error::{check_width, quantize, EdidError};
use crate::DESCRIPTOR_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timing intervals of one detailed timing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct DtdTimings {
    /// Pixel clock in MHz, stored with 0.01 MHz resolution.
    pub pixel_clock: f64,
    pub h_active: u16,
    pub h_blank: u16,
    pub v_active: u16,
    pub v_blank: u16,
    pub h_front_porch: u16,
    pub h_sync_pulse: u16,
    pub v_front_porch: u16,
    pub v_sync_pulse: u16,
}

/// Sync signal definition of a detailed timing.
///
/// For digital sync, `serrations` is only defined with composite sync and
/// `v_sync_positive` only with separate sync; the other one is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)
)]
pub enum Sync {
    Analog {
        bipolar: bool,
        serrations: bool,
        /// Sync on green only; otherwise on all three RGB signals.
        sync_on_green: bool,
    },
    Digital {
        composite: bool,
        serrations: Option<bool>,
        v_sync_positive: Option<bool>,
        h_sync_positive: bool,
    },
}

/// One detailed timing descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct DetailedTimingDescriptor {
    pub timings: DtdTimings,
    /// Image size in mm.
    pub h_size: u16,
    pub v_size: u16,
    pub h_borders: u8,
    pub v_borders: u8,
    pub interlaced: bool,
    /// Stereo mode, 3 bits (see [`STEREO_MODES`]).
    pub stereo: u8,
    pub sync: Sync,
}

/// Stereo modes by the 3-bit `stereo` value.
pub const STEREO_MODES: [&str; 8] = [
    "no stereo",
    "field sequential, sync on right image",
    "field sequential, sync on left image",
    "4-way interleaved",
    "no stereo",
    "2-way interleaved, even lines are right image",
    "2-way interleaved, even lines are left image",
    "side-by-side interleaved",
];

/// What an 18-byte slot holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Timing(DetailedTimingDescriptor),
    /// Display descriptor with a tag byte at offset 3.
    Display,
    /// Zero pixel clock but non-zero byte 2; not a layout the codec knows.
    Unknown,
}

/// Classify and, when it is a timing, decode an 18-byte slot.
pub fn decode(buf: &[u8; DESCRIPTOR_SIZE]) -> Slot {
    if buf[0] == 0 && buf[1] == 0 {
        return if buf[2] == 0 { Slot::Display } else { Slot::Unknown };
    }

    let flags = buf[0x11];
    let sync = if flags & 0x10 != 0 {
        let separate = flags & 0x08 != 0;
        Sync::Digital {
            composite: !separate,
            serrations: (!separate).then_some(flags & 0x04 != 0),
            v_sync_positive: separate.then_some(flags & 0x04 != 0),
            h_sync_positive: flags & 0x02 != 0,
        }
    } else {
        Sync::Analog {
            bipolar: flags & 0x08 != 0,
            serrations: flags & 0x04 != 0,
            sync_on_green: flags & 0x02 == 0,
        }
    };

    Slot::Timing(DetailedTimingDescriptor {
        timings: DtdTimings {
            pixel_clock: u16::from_le_bytes([buf[0], buf[1]]) as f64 / 100.0,
            h_active: (((buf[0x04] & 0xf0) as u16) << 4) | buf[0x02] as u16,
            h_blank: (((buf[0x04] & 0x0f) as u16) << 8) | buf[0x03] as u16,
            v_active: (((buf[0x07] & 0xf0) as u16) << 4) | buf[0x05] as u16,
            v_blank: (((buf[0x07] & 0x0f) as u16) << 8) | buf[0x06] as u16,
            h_front_porch: (((buf[0x0b] & 0xc0) as u16) << 2) | buf[0x08] as u16,
            h_sync_pulse: (((buf[0x0b] & 0x30) as u16) << 4) | buf[0x09] as u16,
            v_front_porch: (((buf[0x0b] & 0x0c) as u16) << 2) | ((buf[0x0a] & 0xf0) >> 4) as u16,
            v_sync_pulse: (((buf[0x0b] & 0x03) as u16) << 4) | (buf[0x0a] & 0x0f) as u16,
        },
        h_size: (((buf[0x0e] & 0xf0) as u16) << 4) | buf[0x0c] as u16,
        v_size: (((buf[0x0e] & 0x0f) as u16) << 8) | buf[0x0d] as u16,
        h_borders: buf[0x0f],
        v_borders: buf[0x10],
        interlaced: flags & 0x80 != 0,
        stereo: ((flags & 0x01) << 2) | ((flags >> 5) & 0x03),
        sync,
    })
}

/// Encode a detailed timing into 18 bytes.
pub fn encode(dtd: &DetailedTimingDescriptor) -> Result<[u8; DESCRIPTOR_SIZE], EdidError> {
    let t = &dtd.timings;
    // Zero would read back as a display descriptor.
    let pc = quantize("dtd.pixel_clock", t.pixel_clock, 100.0, 1, 0xffff)?;
    let h_active = check_width("dtd.h_active", t.h_active as u32, 12)?;
    let h_blank = check_width("dtd.h_blank", t.h_blank as u32, 12)?;
    let v_active = check_width("dtd.v_active", t.v_active as u32, 12)?;
    let v_blank = check_width("dtd.v_blank", t.v_blank as u32, 12)?;
    let h_fp = check_width("dtd.h_front_porch", t.h_front_porch as u32, 10)?;
    let h_sync = check_width("dtd.h_sync_pulse", t.h_sync_pulse as u32, 10)?;
    let v_fp = check_width("dtd.v_front_porch", t.v_front_porch as u32, 6)?;
    let v_sync = check_width("dtd.v_sync_pulse", t.v_sync_pulse as u32, 6)?;
    let h_size = check_width("dtd.h_size", dtd.h_size as u32, 12)?;
    let v_size = check_width("dtd.v_size", dtd.v_size as u32, 12)?;
    let stereo = check_width("dtd.stereo", dtd.stereo as u32, 3)? as u8;

    let sync_bits = match dtd.sync {
        Sync::Analog {
            bipolar,
            serrations,
            sync_on_green,
        } => {
            (if bipolar { 0x08 } else { 0 })
                | (if serrations { 0x04 } else { 0 })
                | (if sync_on_green { 0 } else { 0x02 })
        }
        Sync::Digital {
            composite,
            serrations,
            v_sync_positive,
            h_sync_positive,
        } => {
            let bit2 = if composite {
                serrations.unwrap_or(false)
            } else {
                v_sync_positive.unwrap_or(false)
            };
            0x10 | (if composite { 0 } else { 0x08 })
                | (if bit2 { 0x04 } else { 0 })
                | (if h_sync_positive { 0x02 } else { 0 })
        }
    };

    let pc = (pc as u16).to_le_bytes();
    Ok([
        pc[0],
        pc[1],
        (h_active & 0xff) as u8,
        (h_blank & 0xff) as u8,
        (((h_active >> 4) & 0xf0) | ((h_blank >> 8) & 0x0f)) as u8,
        (v_active & 0xff) as u8,
        (v_blank & 0xff) as u8,
        (((v_active >> 4) & 0xf0) | ((v_blank >> 8) & 0x0f)) as u8,
        (h_fp & 0xff) as u8,
        (h_sync & 0xff) as u8,
        (((v_fp << 4) & 0xf0) | (v_sync & 0x0f)) as u8,
        (((h_fp >> 2) & 0xc0) | ((h_sync >> 4) & 0x30) | ((v_fp >> 2) & 0x0c) | ((v_sync >> 4) & 0x03))
            as u8,
        (h_size & 0xff) as u8,
        (v_size & 0xff) as u8,
        (((h_size >> 4) & 0xf0) | ((v_size >> 8) & 0x0f)) as u8,
        dtd.h_borders,
        dtd.v_borders,
        (if dtd.interlaced { 0x80 } else { 0 })
            | ((stereo << 5) & 0x60)
            | ((stereo >> 2) & 0x01)
            | sync_bits,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1920x1080@60 (148.5 MHz), 510x287 mm, digital separate sync, +h +v.
    const DTD_1080P: [u8; 18] = [
        0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0xFE, 0x1F,
        0x11, 0x00, 0x00, 0x1E,
    ];

    fn unwrap_timing(slot: Slot) -> DetailedTimingDescriptor {
        match slot {
            Slot::Timing(dtd) => dtd,
            other => panic!("expected timing, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_1080p() {
        let dtd = unwrap_timing(decode(&DTD_1080P));
        let t = dtd.timings;
        assert_eq!(t.pixel_clock, 148.5);
        assert_eq!((t.h_active, t.h_blank), (1920, 280));
        assert_eq!((t.v_active, t.v_blank), (1080, 45));
        assert_eq!((t.h_front_porch, t.h_sync_pulse), (88, 44));
        assert_eq!((t.v_front_porch, t.v_sync_pulse), (4, 5));
        assert_eq!((dtd.h_size, dtd.v_size), (510, 287));
        assert!(!dtd.interlaced);
        assert_eq!(dtd.stereo, 0);
        assert_eq!(
            dtd.sync,
            Sync::Digital {
                composite: false,
                serrations: None,
                v_sync_positive: Some(true),
                h_sync_positive: true,
            }
        );
        assert_eq!(encode(&dtd).unwrap(), DTD_1080P);
    }

    #[test]
    fn test_display_descriptor_detected() {
        let mut buf = [0u8; 18];
        buf[3] = 0xFC;
        assert_eq!(decode(&buf), Slot::Display);
    }

    #[test]
    fn test_unknown_slot_detected() {
        let mut buf = [0u8; 18];
        buf[2] = 0x42;
        assert_eq!(decode(&buf), Slot::Unknown);
    }

    #[test]
    fn test_high_bits_straddle_bytes() {
        let mut buf = DTD_1080P;
        // Max out every split field.
        buf[0x04] = 0xFF;
        buf[0x07] = 0xFF;
        buf[0x0a] = 0xFF;
        buf[0x0b] = 0xFF;
        buf[0x0e] = 0xFF;
        let dtd = unwrap_timing(decode(&buf));
        let t = dtd.timings;
        assert_eq!(t.h_active, 0xF80);
        assert_eq!(t.h_blank, 0xF18);
        assert_eq!(t.h_front_porch, 0x358);
        assert_eq!(t.h_sync_pulse, 0x32C);
        assert_eq!(t.v_front_porch, 0x3F);
        assert_eq!(t.v_sync_pulse, 0x3F);
        assert_eq!(dtd.h_size, 0xFFE);
        assert_eq!(dtd.v_size, 0xF1F);
        assert_eq!(encode(&dtd).unwrap(), buf);
    }

    #[test]
    fn test_sync_nullability() {
        let mut buf = DTD_1080P;
        // Digital composite with serrations.
        buf[0x11] = 0x14;
        let dtd = unwrap_timing(decode(&buf));
        assert_eq!(
            dtd.sync,
            Sync::Digital {
                composite: true,
                serrations: Some(true),
                v_sync_positive: None,
                h_sync_positive: false,
            }
        );
        assert_eq!(encode(&dtd).unwrap(), buf);

        // Analog bipolar, sync on all RGB.
        buf[0x11] = 0x0A;
        let dtd = unwrap_timing(decode(&buf));
        assert_eq!(
            dtd.sync,
            Sync::Analog {
                bipolar: true,
                serrations: false,
                sync_on_green: false,
            }
        );
        assert_eq!(encode(&dtd).unwrap(), buf);
    }

    #[test]
    fn test_stereo_bit_layout() {
        for stereo in 0..8u8 {
            let mut dtd = unwrap_timing(decode(&DTD_1080P));
            dtd.stereo = stereo;
            dtd.interlaced = true;
            let bytes = encode(&dtd).unwrap();
            assert_eq!(bytes[0x11] & 0x80, 0x80);
            assert_eq!(unwrap_timing(decode(&bytes)).stereo, stereo);
        }
    }

    #[test]
    fn test_encode_rejects_wide_fields() {
        let mut dtd = unwrap_timing(decode(&DTD_1080P));
        dtd.timings.v_sync_pulse = 64;
        assert!(matches!(
            encode(&dtd),
            Err(EdidError::FieldRange { field: "dtd.v_sync_pulse", .. })
        ));

        let mut dtd = unwrap_timing(decode(&DTD_1080P));
        dtd.timings.pixel_clock = 0.0;
        assert!(encode(&dtd).is_err());
    }
}
