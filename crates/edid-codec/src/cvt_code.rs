//! Three-byte CVT timing codes.

use crate::error::{check_range, check_width, EdidError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aspect ratios selected by the two-bit field, in code order.
pub const ASPECT_RATIOS: [(u8, u8); 4] = [(4, 3), (16, 9), (16, 10), (15, 9)];

/// Preferred vertical rates selected by the two-bit field, in Hz.
pub const PREFERRED_RATES: [u8; 4] = [50, 60, 75, 85];

/// Vertical rates a CVT code advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SupportedRates {
    pub hz50: bool,
    pub hz60: bool,
    pub hz75: bool,
    pub hz85: bool,
    /// 60 Hz with reduced blanking.
    pub hz60_reduced: bool,
}

/// One decoded CVT 3-byte timing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CvtTimingCode {
    /// Vertical active lines (even, 2..=8192).
    pub v_active: u16,
    /// Index into [`ASPECT_RATIOS`].
    pub aspect_ratio: u8,
    /// Index into [`PREFERRED_RATES`].
    pub preferred_v_rate: u8,
    pub v_rates: SupportedRates,
    /// Reserved low bits of byte 1.
    pub rsvd0: u8,
    /// Reserved top bit of byte 2.
    pub rsvd1: u8,
}

/// Decode one code.
pub fn decode(bytes: [u8; 3]) -> CvtTimingCode {
    let raw = bytes[0] as u16 | (((bytes[1] & 0xf0) as u16) << 4);
    CvtTimingCode {
        v_active: 2 * (raw + 1),
        aspect_ratio: (bytes[1] >> 2) & 0x03,
        preferred_v_rate: (bytes[2] >> 5) & 0x03,
        v_rates: SupportedRates {
            hz50: bytes[2] & 0x10 != 0,
            hz60: bytes[2] & 0x08 != 0,
            hz75: bytes[2] & 0x04 != 0,
            hz85: bytes[2] & 0x02 != 0,
            hz60_reduced: bytes[2] & 0x01 != 0,
        },
        rsvd0: bytes[1] & 0x03,
        rsvd1: (bytes[2] >> 7) & 0x01,
    }
}

/// Encode one code.
pub fn encode(code: &CvtTimingCode) -> Result<[u8; 3], EdidError> {
    let v = check_range("cvt_code.v_active", code.v_active as u32, 2, 8192)?;
    if v % 2 != 0 {
        return Err(EdidError::FieldRange {
            field: "cvt_code.v_active",
            value: v as f64,
            min: 2.0,
            max: 8192.0,
        });
    }
    let raw = v / 2 - 1;
    let ar = check_width("cvt_code.aspect_ratio", code.aspect_ratio as u32, 2)?;
    let pref = check_width("cvt_code.preferred_v_rate", code.preferred_v_rate as u32, 2)?;
    let rsvd0 = check_width("cvt_code.rsvd0", code.rsvd0 as u32, 2)?;
    let rsvd1 = check_width("cvt_code.rsvd1", code.rsvd1 as u32, 1)?;
    let rates = &code.v_rates;
    Ok([
        (raw & 0xff) as u8,
        (((raw >> 4) & 0xf0) | (ar << 2) | rsvd0) as u8,
        ((rsvd1 << 7) | (pref << 5)) as u8
            | if rates.hz50 { 0x10 } else { 0 }
            | if rates.hz60 { 0x08 } else { 0 }
            | if rates.hz75 { 0x04 } else { 0 }
            | if rates.hz85 { 0x02 } else { 0 }
            | if rates.hz60_reduced { 0x01 } else { 0 },
    ])
}
