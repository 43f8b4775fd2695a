#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete video mode as produced by [`crate::cvt()`] and [`crate::gtf()`].
///
/// Horizontal values are pixels, vertical values are lines. `v_total` and
/// `v_front_porch` carry the extra half line of interlaced modes. Rates are
/// MHz for the pixel clock, kHz for `h_rate` and Hz for the vertical rates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingParameterSet {
    pub h_total: u32,
    pub h_active: u32,
    pub h_front_porch: u32,
    pub h_sync: u32,
    pub h_back_porch: u32,

    pub v_total: f64,
    pub v_active: u32,
    pub v_front_porch: f64,
    pub v_sync: u32,
    pub v_back_porch: u32,

    pub pixel_clock: f64,
    pub h_rate: f64,
    pub v_field_rate: f64,
    pub v_rate: f64,

    pub border_left: u32,
    pub border_right: u32,
    pub border_top: u32,
    pub border_bottom: u32,

    pub interlaced: bool,
    pub h_sync_positive: bool,
    pub v_sync_positive: bool,
}

impl TimingParameterSet {
    /// Horizontal blanking, borders excluded.
    pub fn h_blank(&self) -> u32 {
        self.h_front_porch + self.h_sync + self.h_back_porch
    }

    /// Vertical blanking of one field, borders excluded, rounded down.
    pub fn v_blank(&self) -> u32 {
        self.v_front_porch as u32 + self.v_sync + self.v_back_porch
    }
}
