//! Display range limits descriptor (tag 0xFD).

use crate::error::{check_range, check_width, quantize, EdidError};
use crate::DESCRIPTOR_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const TAG: u8 = 0xFD;

/// `timing_support` selecting the secondary GTF curve payload.
pub const SECONDARY_GTF: u8 = 0x02;
/// `timing_support` selecting the CVT support payload.
pub const CVT_SUPPORT: u8 = 0x04;

/// Monitor range limits.
///
/// Rates above 255 use the +255 offset flags in byte 4. A rate of exactly 255
/// has two encodings, `0xFF` unflagged or `0x00` flagged; `offset_flags`
/// decides between them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct DisplayRangeLimits {
    /// Reserved high nibble of byte 4.
    pub rsvd0: u8,
    /// Offset flags of byte 4 as read (v_min 0x01, v_max 0x02, h_min 0x04,
    /// h_max 0x08). Only consulted for rates of exactly 255.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset_flags: u8,
    /// Vertical rates in Hz.
    pub v_min_rate: u16,
    pub v_max_rate: u16,
    /// Horizontal rates in kHz.
    pub h_min_rate: u16,
    pub h_max_rate: u16,
    /// Maximum pixel clock in MHz, 10 MHz steps.
    pub max_pixel_clock: u16,
    pub formula: RangeFormula,
}

/// Payload selected by the `timing_support` byte.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RangeFormula {
    /// Any selector without a dedicated payload (0 = default GTF, 1 = range limits only).
    Plain {
        timing_support: u8,
        /// Byte 0x0B, normally 0x0A.
        rsvd_0a: u8,
        /// Bytes 0x0C..0x11, normally spaces.
        rsvd1: [u8; 6],
    },
    SecondaryGtf(SecondaryGtf),
    Cvt(CvtSupport),
}

/// Secondary GTF curve coefficients.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SecondaryGtf {
    pub rsvd0: u8,
    /// Start break frequency in kHz (2 kHz steps).
    pub h_rate_break: u16,
    /// C, 0.5 steps.
    pub c: f64,
    pub m: u16,
    pub k: u8,
    /// J, 0.5 steps.
    pub j: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CvtAspectRatios {
    pub ratio_4_3: bool,
    pub ratio_16_9: bool,
    pub ratio_16_10: bool,
    pub ratio_5_4: bool,
    pub ratio_15_9: bool,
    pub rsvd0: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CvtBlanking {
    pub standard: bool,
    /// Reduced blanking; preferred when set.
    pub reduced: bool,
    pub rsvd0: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CvtScaling {
    pub h_shrink: bool,
    pub h_stretch: bool,
    pub v_shrink: bool,
    pub v_stretch: bool,
    pub rsvd0: u8,
}

/// CVT capabilities of the display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CvtSupport {
    /// Major and minor version nibbles.
    pub version: [u8; 2],
    /// Maximum pixel clock in MHz with 0.25 MHz precision. Never above the
    /// coarse limit of the enclosing descriptor, and at most 15.75 MHz below.
    pub max_pixel_clock: f64,
    /// Maximum active pixels per line (8 pixel steps, 0 = no limit).
    pub h_max_active: u16,
    pub aspect_ratios: CvtAspectRatios,
    /// Index into 4:3, 16:9, 16:10, 5:4, 15:9.
    pub preferred_aspect_ratio: u8,
    pub blanking_support: CvtBlanking,
    pub scaling_support: CvtScaling,
    /// Preferred refresh in Hz.
    pub preferred_v_rate: u8,
}

/// Decode a range limits descriptor; the tag has been checked by the caller.
pub fn decode(buf: &[u8; DESCRIPTOR_SIZE]) -> DisplayRangeLimits {
    let offset = |flag: u8| if buf[0x04] & flag != 0 { 255 } else { 0 };
    let formula = match buf[0x0a] {
        SECONDARY_GTF => RangeFormula::SecondaryGtf(SecondaryGtf {
            rsvd0: buf[0x0b],
            h_rate_break: buf[0x0c] as u16 * 2,
            c: buf[0x0d] as f64 / 2.0,
            m: u16::from_le_bytes([buf[0x0e], buf[0x0f]]),
            k: buf[0x10],
            j: buf[0x11] as f64 / 2.0,
        }),
        CVT_SUPPORT => RangeFormula::Cvt(CvtSupport {
            version: [buf[0x0b] >> 4, buf[0x0b] & 0x0f],
            max_pixel_clock: buf[0x09] as f64 * 10.0 - (buf[0x0c] >> 2) as f64 / 4.0,
            h_max_active: ((((buf[0x0c] & 0x03) as u16) << 8) | buf[0x0d] as u16) * 8,
            aspect_ratios: CvtAspectRatios {
                ratio_4_3: buf[0x0e] & 0x80 != 0,
                ratio_16_9: buf[0x0e] & 0x40 != 0,
                ratio_16_10: buf[0x0e] & 0x20 != 0,
                ratio_5_4: buf[0x0e] & 0x10 != 0,
                ratio_15_9: buf[0x0e] & 0x08 != 0,
                rsvd0: buf[0x0e] & 0x07,
            },
            preferred_aspect_ratio: buf[0x0f] >> 5,
            blanking_support: CvtBlanking {
                standard: buf[0x0f] & 0x08 != 0,
                reduced: buf[0x0f] & 0x10 != 0,
                rsvd0: buf[0x0f] & 0x07,
            },
            scaling_support: CvtScaling {
                h_shrink: buf[0x10] & 0x80 != 0,
                h_stretch: buf[0x10] & 0x40 != 0,
                v_shrink: buf[0x10] & 0x20 != 0,
                v_stretch: buf[0x10] & 0x10 != 0,
                rsvd0: buf[0x10] & 0x0f,
            },
            preferred_v_rate: buf[0x11],
        }),
        timing_support => {
            let mut rsvd1 = [0u8; 6];
            rsvd1.copy_from_slice(&buf[0x0c..0x12]);
            RangeFormula::Plain {
                timing_support,
                rsvd_0a: buf[0x0b],
                rsvd1,
            }
        }
    };

    DisplayRangeLimits {
        rsvd0: buf[0x04] >> 4,
        offset_flags: buf[0x04] & 0x0f,
        v_min_rate: offset(0x01) + buf[0x05] as u16,
        v_max_rate: offset(0x02) + buf[0x06] as u16,
        h_min_rate: offset(0x04) + buf[0x07] as u16,
        h_max_rate: offset(0x08) + buf[0x08] as u16,
        max_pixel_clock: buf[0x09] as u16 * 10,
        formula,
    }
}

/// Split a rate into its offset flag and stored byte.
fn split_rate(
    field: &'static str,
    rate: u16,
    offset_flags: u8,
    flag: u8,
) -> Result<(bool, u8), EdidError> {
    let rate = check_range(field, rate as u32, 0, 510)?;
    Ok(if rate > 255 || (rate == 255 && offset_flags & flag != 0) {
        (true, (rate - 255) as u8)
    } else {
        (false, rate as u8)
    })
}

/// Encode a range limits descriptor.
pub fn encode(rl: &DisplayRangeLimits) -> Result<[u8; DESCRIPTOR_SIZE], EdidError> {
    let mut buf = [0u8; DESCRIPTOR_SIZE];
    buf[0x03] = TAG;

    let (v_min_hi, v_min) =
        split_rate("range_limits.v_min_rate", rl.v_min_rate, rl.offset_flags, 0x01)?;
    let (v_max_hi, v_max) =
        split_rate("range_limits.v_max_rate", rl.v_max_rate, rl.offset_flags, 0x02)?;
    let (h_min_hi, h_min) =
        split_rate("range_limits.h_min_rate", rl.h_min_rate, rl.offset_flags, 0x04)?;
    let (h_max_hi, h_max) =
        split_rate("range_limits.h_max_rate", rl.h_max_rate, rl.offset_flags, 0x08)?;
    let rsvd0 = check_width("range_limits.rsvd0", rl.rsvd0 as u32, 4)? as u8;

    buf[0x04] = (rsvd0 << 4)
        | (if v_min_hi { 0x01 } else { 0 })
        | (if v_max_hi { 0x02 } else { 0 })
        | (if h_min_hi { 0x04 } else { 0 })
        | (if h_max_hi { 0x08 } else { 0 });
    buf[0x05] = v_min;
    buf[0x06] = v_max;
    buf[0x07] = h_min;
    buf[0x08] = h_max;
    buf[0x09] = quantize(
        "range_limits.max_pixel_clock",
        rl.max_pixel_clock as f64,
        0.1,
        0,
        255,
    )? as u8;

    match &rl.formula {
        RangeFormula::Plain {
            timing_support,
            rsvd_0a,
            rsvd1,
        } => {
            if matches!(*timing_support, SECONDARY_GTF | CVT_SUPPORT) {
                return Err(EdidError::SelectorConflict(*timing_support));
            }
            buf[0x0a] = *timing_support;
            buf[0x0b] = *rsvd_0a;
            buf[0x0c..0x12].copy_from_slice(rsvd1);
        }
        RangeFormula::SecondaryGtf(gs) => {
            buf[0x0a] = SECONDARY_GTF;
            buf[0x0b] = gs.rsvd0;
            buf[0x0c] = quantize("gtf_secondary.h_rate_break", gs.h_rate_break as f64, 0.5, 0, 255)?
                as u8;
            buf[0x0d] = quantize("gtf_secondary.c", gs.c, 2.0, 0, 255)? as u8;
            buf[0x0e..0x10].copy_from_slice(&gs.m.to_le_bytes());
            buf[0x10] = gs.k;
            buf[0x11] = quantize("gtf_secondary.j", gs.j, 2.0, 0, 255)? as u8;
        }
        RangeFormula::Cvt(cvt) => {
            buf[0x0a] = CVT_SUPPORT;
            let major = check_width("cvt.version[0]", cvt.version[0] as u32, 4)?;
            let minor = check_width("cvt.version[1]", cvt.version[1] as u32, 4)?;
            buf[0x0b] = ((major << 4) | minor) as u8;

            // The fine limit is stored as 0.25 MHz steps below the coarse limit.
            let coarse = buf[0x09] as f64 * 10.0;
            let steps = quantize("cvt.max_pixel_clock", coarse - cvt.max_pixel_clock, 4.0, 0, 63)?;
            let hma = quantize("cvt.h_max_active", cvt.h_max_active as f64, 0.125, 0, 0x3ff)?;
            buf[0x0c] = ((steps << 2) | (hma >> 8)) as u8;
            buf[0x0d] = (hma & 0xff) as u8;

            let ars = &cvt.aspect_ratios;
            buf[0x0e] = (if ars.ratio_4_3 { 0x80 } else { 0 })
                | (if ars.ratio_16_9 { 0x40 } else { 0 })
                | (if ars.ratio_16_10 { 0x20 } else { 0 })
                | (if ars.ratio_5_4 { 0x10 } else { 0 })
                | (if ars.ratio_15_9 { 0x08 } else { 0 })
                | check_width("cvt.aspect_ratios.rsvd0", ars.rsvd0 as u32, 3)? as u8;

            let pref = check_width("cvt.preferred_aspect_ratio", cvt.preferred_aspect_ratio as u32, 3)?;
            let bs = &cvt.blanking_support;
            buf[0x0f] = ((pref as u8) << 5)
                | (if bs.reduced { 0x10 } else { 0 })
                | (if bs.standard { 0x08 } else { 0 })
                | check_width("cvt.blanking_support.rsvd0", bs.rsvd0 as u32, 3)? as u8;

            let ss = &cvt.scaling_support;
            buf[0x10] = (if ss.h_shrink { 0x80 } else { 0 })
                | (if ss.h_stretch { 0x40 } else { 0 })
                | (if ss.v_shrink { 0x20 } else { 0 })
                | (if ss.v_stretch { 0x10 } else { 0 })
                | check_width("cvt.scaling_support.rsvd0", ss.rsvd0 as u32, 4)? as u8;

            buf[0x11] = cvt.preferred_v_rate;
        }
    }

    Ok(buf)
}
