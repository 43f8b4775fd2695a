//! Two-byte standard timing codes.

use crate::error::{check_range, check_width, EdidError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte pair marking an unused slot.
pub const UNUSED: [u8; 2] = [0x01, 0x01];

/// Image aspect ratios selected by the two-bit field, in code order (EDID 1.3+).
pub const ASPECT_RATIOS: [(u8, u8); 4] = [(16, 10), (4, 3), (5, 4), (16, 9)];

/// One standard timing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct StandardTiming {
    /// Horizontal active pixels divided by 8 (31..=286).
    pub h_active8: u16,
    /// Index into [`ASPECT_RATIOS`].
    pub aspect_ratio: u8,
    /// Vertical refresh in Hz (60..=123).
    pub refresh_rate: u8,
}

impl StandardTiming {
    /// Horizontal active pixels.
    pub fn h_active(&self) -> u32 {
        self.h_active8 as u32 * 8
    }

    /// Vertical active lines implied by the aspect ratio.
    pub fn v_active(&self) -> u32 {
        let (num, den) = ASPECT_RATIOS[(self.aspect_ratio & 0x03) as usize];
        self.h_active() * den as u32 / num as u32
    }
}

/// Decode a slot; the unused sentinel yields `None`.
pub fn decode(bytes: [u8; 2]) -> Option<StandardTiming> {
    if bytes == UNUSED {
        return None;
    }
    Some(StandardTiming {
        h_active8: bytes[0] as u16 + 31,
        aspect_ratio: (bytes[1] >> 6) & 0x03,
        refresh_rate: (bytes[1] & 0x3f) + 60,
    })
}

/// Encode a slot; `None` yields the unused sentinel.
pub fn encode(timing: Option<&StandardTiming>) -> Result<[u8; 2], EdidError> {
    let Some(t) = timing else {
        return Ok(UNUSED);
    };
    let h = check_range("standard_timing.h_active8", t.h_active8 as u32, 31, 286)? - 31;
    let ar = check_width("standard_timing.aspect_ratio", t.aspect_ratio as u32, 2)?;
    let rate = check_range("standard_timing.refresh_rate", t.refresh_rate as u32, 60, 123)? - 60;
    Ok([h as u8, ((ar << 6) | rate) as u8])
}
