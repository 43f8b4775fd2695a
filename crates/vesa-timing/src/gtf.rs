//! VESA Generalized Timing Formula.

use crate::error::TimingError;
use crate::params::TimingParameterSet;
use crate::{check_period, check_request, count};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const CELL_GRAN: f64 = 8.0;
const MARGIN_PERCENT: f64 = 1.8;
const H_SYNC_PERCENT: f64 = 8.0;
const MIN_PORCH: f64 = 1.0;
const MIN_VSYNC_BP: f64 = 550.0;
const V_SYNC: u32 = 3;

/// Blanking curve parameters.
///
/// The defaults are the values every GTF monitor assumes unless it
/// advertises a secondary curve in its range limits descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GtfParams {
    /// Blanking formula gradient, %/kHz.
    pub m: f64,
    /// Blanking formula offset, %.
    pub c: f64,
    /// Blanking formula scaling factor.
    pub k: f64,
    /// Scaling factor weighting, %.
    pub j: f64,
}

impl Default for GtfParams {
    fn default() -> Self {
        Self {
            m: 600.0,
            c: 40.0,
            k: 128.0,
            j: 20.0,
        }
    }
}

impl GtfParams {
    fn c_prime(&self) -> f64 {
        ((self.c - self.j) * self.k / 256.0) + self.j
    }

    fn m_prime(&self) -> f64 {
        self.m * self.k / 256.0
    }
}

/// `val * num / den` rounded to the nearest whole number of cells.
fn cell_rnd(num: f64, den: f64, val: f64) -> f64 {
    CELL_GRAN * ((val * num / den) / CELL_GRAN).round()
}

/// Generate a GTF timing for the requested mode.
///
/// `refresh_rate` is the frame rate; interlaced modes run two fields per frame.
pub fn gtf(
    h_active: u32,
    v_active: u32,
    refresh_rate: f64,
    interlaced: bool,
    margins: bool,
    params: &GtfParams,
) -> Result<TimingParameterSet, TimingError> {
    check_request(h_active, v_active, refresh_rate, CELL_GRAN as u32)?;

    let h_pixels_rnd = (h_active as f64 / CELL_GRAN).round() * CELL_GRAN;
    let v_lines_rnd = if interlaced {
        (v_active as f64 / 2.0).round()
    } else {
        v_active as f64
    };
    let v_field_rate_rqd = if interlaced {
        2.0 * refresh_rate
    } else {
        refresh_rate
    };

    let (border_h, border_v) = if margins {
        (
            cell_rnd(MARGIN_PERCENT, 100.0, h_pixels_rnd),
            (MARGIN_PERCENT / 100.0 * v_lines_rnd).round(),
        )
    } else {
        (0.0, 0.0)
    };

    let total_active_pixels = h_pixels_rnd + 2.0 * border_h;
    let interlace_add = if interlaced { 0.5 } else { 0.0 };

    let h_period_est = check_period(
        1_000_000.0 * ((1.0 / v_field_rate_rqd) - MIN_VSYNC_BP / 1_000_000.0)
            / (v_lines_rnd + 2.0 * border_v + MIN_PORCH + interlace_add),
    )?;

    let v_sync_bp = (MIN_VSYNC_BP / h_period_est).round();
    let v_total = v_lines_rnd + 2.0 * border_v + v_sync_bp + interlace_add + MIN_PORCH;

    // One refinement step lands the field rate on the requested value.
    let v_field_rate_est = 1.0 / h_period_est / v_total * 1_000_000.0;
    let h_period = h_period_est / (v_field_rate_rqd / v_field_rate_est);
    let v_field_rate = 1.0 / h_period / v_total * 1_000_000.0;

    let duty_cycle = params.c_prime() - (params.m_prime() * h_period / 1000.0);
    let h_blank = (total_active_pixels * duty_cycle / (100.0 - duty_cycle) / (2.0 * CELL_GRAN))
        .round()
        * (2.0 * CELL_GRAN);
    let h_total = total_active_pixels + h_blank;
    let h_sync = cell_rnd(H_SYNC_PERCENT, 100.0, h_total);

    Ok(TimingParameterSet {
        h_total: count("h_total", h_total)?,
        h_active,
        h_front_porch: count("h_front_porch", h_blank / 2.0 - h_sync)?,
        h_sync: count("h_sync", h_sync)?,
        h_back_porch: count("h_back_porch", h_blank / 2.0)?,

        v_total,
        v_active,
        v_front_porch: MIN_PORCH + interlace_add,
        v_sync: V_SYNC,
        v_back_porch: count("v_back_porch", v_sync_bp - V_SYNC as f64)?,

        pixel_clock: h_total / h_period,
        h_rate: 1000.0 / h_period,
        v_field_rate,
        v_rate: if interlaced {
            v_field_rate / 2.0
        } else {
            v_field_rate
        },

        border_left: border_h as u32,
        border_right: border_h as u32,
        border_top: border_v as u32,
        border_bottom: border_v as u32,

        interlaced,
        h_sync_positive: false,
        v_sync_positive: true,
    })
}
