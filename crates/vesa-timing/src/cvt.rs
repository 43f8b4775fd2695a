//! VESA Coordinated Video Timing 1.2.

use std::fmt;
use std::str::FromStr;

use crate::error::TimingError;
use crate::params::TimingParameterSet;
use crate::{check_period, check_request, count};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const CELL_GRAN: f64 = 8.0;
const MARGIN_PERCENT: f64 = 1.8;
const H_SYNC_PERCENT: f64 = 8.0;
const MIN_V_BACK_PORCH: f64 = 6.0;
const MIN_V_PORCH: f64 = 3.0;

const C: f64 = 40.0;
const M: f64 = 600.0;
const K: f64 = 128.0;
const J: f64 = 20.0;
const C_PRIME: f64 = ((C - J) * K / 256.0) + J;
const M_PRIME: f64 = M * K / 256.0;

const MIN_VSYNC_BP: f64 = 550.0;
const MIN_DUTY_CYCLE: f64 = 20.0;
const CLOCK_STEP: f64 = 0.25;

const RB_H_SYNC: f64 = 32.0;
const RB_MIN_V_BLANK: f64 = 460.0;
const RB_MIN_V_BACK_PORCH: f64 = 6.0;
const RB2_V_SYNC: f64 = 8.0;

/// Aspect ratio classes and the vertical sync width each one signals.
const ASPECT_V_SYNC: [(f64, f64, u32); 5] = [
    (4.0, 3.0, 4),
    (16.0, 9.0, 5),
    (16.0, 10.0, 6),
    (5.0, 4.0, 7),
    (15.0, 9.0, 7),
];
const DEFAULT_V_SYNC: u32 = 10;

/// Blanking model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ReducedBlanking {
    /// Standard CRT-style blanking.
    #[default]
    Off,
    /// Reduced blanking, 160 pixel horizontal blank.
    V1,
    /// Reduced blanking v2, 80 pixel horizontal blank, 1 kHz clock steps.
    V2,
    /// As [`ReducedBlanking::V2`] with the clock scaled by 1000/1001.
    V2Video,
}

impl FromStr for ReducedBlanking {
    type Err = TimingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" | "0" | "false" => Ok(Self::Off),
            "v1" | "1" | "true" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            "v2-video" | "2video" => Ok(Self::V2Video),
            other => Err(TimingError::UnknownReducedBlanking(other.to_string())),
        }
    }
}

impl fmt::Display for ReducedBlanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V2Video => "v2-video",
        })
    }
}

/// `val * num / den` rounded down to a whole number of cells.
fn cell_rnd(num: f64, den: f64, val: f64) -> f64 {
    CELL_GRAN * ((val * num / den) / CELL_GRAN).floor()
}

/// Generate a CVT timing for the requested mode.
///
/// `refresh_rate` is the field rate in Hz. For interlaced modes `v_active` is
/// the frame height and each field carries half of it. `margins` adds the
/// standard 1.8 % border on every side.
pub fn cvt(
    h_active: u32,
    v_active: u32,
    refresh_rate: f64,
    reduced_blanking: ReducedBlanking,
    interlaced: bool,
    margins: bool,
) -> Result<TimingParameterSet, TimingError> {
    check_request(h_active, v_active, refresh_rate, CELL_GRAN as u32)?;

    let v_field_rate_rqd = refresh_rate;
    let h_pixels_rnd = (h_active as f64 / CELL_GRAN).floor() * CELL_GRAN;

    let aspect = ASPECT_V_SYNC
        .iter()
        .find(|&&(num, den, _)| h_pixels_rnd == cell_rnd(num, den, v_active as f64));
    if aspect.is_none() {
        log::debug!(
            "{}x{} matches no CVT aspect ratio, using v_sync {}",
            h_active,
            v_active,
            DEFAULT_V_SYNC
        );
    }
    let mut v_sync = aspect.map_or(DEFAULT_V_SYNC, |&(_, _, v_sync)| v_sync) as f64;

    let v_lines_rnd = if interlaced {
        (v_active as f64 / 2.0).floor()
    } else {
        v_active as f64
    };

    let (border_h, border_v) = if margins {
        (
            cell_rnd(MARGIN_PERCENT, 100.0, h_pixels_rnd),
            (MARGIN_PERCENT / 100.0 * v_lines_rnd).floor(),
        )
    } else {
        (0.0, 0.0)
    };

    let total_active_pixels = h_pixels_rnd + 2.0 * border_h;
    let interlace_add = if interlaced { 0.5 } else { 0.0 };

    let (h_blank, h_sync, v_total, v_front_porch, v_back_porch, pixel_clock, sync_positive) =
        match reduced_blanking {
            ReducedBlanking::Off => {
                let h_period_est = check_period(
                    1_000_000.0 * ((1.0 / v_field_rate_rqd) - MIN_VSYNC_BP / 1_000_000.0)
                        / (v_lines_rnd + 2.0 * border_v + MIN_V_PORCH + interlace_add),
                )?;

                let v_sync_bp =
                    (v_sync + MIN_V_BACK_PORCH).max((MIN_VSYNC_BP / h_period_est).floor() + 1.0);
                let v_total =
                    v_lines_rnd + 2.0 * border_v + v_sync_bp + interlace_add + MIN_V_PORCH;

                let duty_cycle = (C_PRIME - (M_PRIME * h_period_est / 1000.0)).max(MIN_DUTY_CYCLE);
                let h_blank = (total_active_pixels * duty_cycle
                    / (100.0 - duty_cycle)
                    / (2.0 * CELL_GRAN))
                    .floor()
                    * (2.0 * CELL_GRAN);
                let h_total = total_active_pixels + h_blank;
                let h_sync = cell_rnd(H_SYNC_PERCENT, 100.0, h_total);
                let pixel_clock = ((h_total / h_period_est) / CLOCK_STEP).floor() * CLOCK_STEP;

                (
                    h_blank,
                    h_sync,
                    v_total,
                    MIN_V_PORCH,
                    v_sync_bp - v_sync,
                    pixel_clock,
                    false,
                )
            }
            rb => {
                let (clock_step, clock_factor, h_blank, rb_v_front_porch) = match rb {
                    ReducedBlanking::V1 => (0.25, 1.0, 160.0, 3.0),
                    ReducedBlanking::V2 => (0.001, 1.0, 80.0, 1.0),
                    _ => (0.001, 1000.0 / 1001.0, 80.0, 1.0),
                };
                if rb != ReducedBlanking::V1 {
                    v_sync = RB2_V_SYNC;
                }

                let h_period_est = check_period(
                    ((1_000_000.0 / v_field_rate_rqd) - RB_MIN_V_BLANK)
                        / (v_lines_rnd + 2.0 * border_v),
                )?;

                let vbi_lines = (RB_MIN_V_BLANK / h_period_est).floor() + 1.0;
                let v_blank = vbi_lines.max(rb_v_front_porch + v_sync + RB_MIN_V_BACK_PORCH);
                let v_front_porch = if rb == ReducedBlanking::V1 {
                    rb_v_front_porch
                } else {
                    v_blank - RB_MIN_V_BACK_PORCH - v_sync
                };

                let v_total = v_blank + v_lines_rnd + 2.0 * border_v + interlace_add;
                let h_total = total_active_pixels + h_blank;
                let pixel_clock = ((v_field_rate_rqd * v_total * h_total / 1_000_000.0
                    * clock_factor)
                    / clock_step)
                    .floor()
                    * clock_step;

                (
                    h_blank,
                    RB_H_SYNC,
                    v_total,
                    v_front_porch,
                    v_blank - v_front_porch - v_sync,
                    pixel_clock,
                    true,
                )
            }
        };

    let h_total = total_active_pixels + h_blank;
    let h_rate = 1000.0 * pixel_clock / h_total;
    let v_field_rate = 1000.0 * h_rate / v_total;

    Ok(TimingParameterSet {
        h_total: count("h_total", h_total)?,
        h_active,
        h_front_porch: count("h_front_porch", h_blank / 2.0 - h_sync)?,
        h_sync: count("h_sync", h_sync)?,
        h_back_porch: count("h_back_porch", h_blank / 2.0)?,

        v_total,
        v_active,
        v_front_porch,
        v_sync: v_sync as u32,
        v_back_porch: count("v_back_porch", v_back_porch)?,

        pixel_clock,
        h_rate,
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
        h_sync_positive: sync_positive,
        v_sync_positive: !sync_positive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_blanking_from_str() {
        assert_eq!("off".parse(), Ok(ReducedBlanking::Off));
        assert_eq!("1".parse(), Ok(ReducedBlanking::V1));
        assert_eq!("v2".parse(), Ok(ReducedBlanking::V2));
        assert_eq!("2video".parse(), Ok(ReducedBlanking::V2Video));
        assert_eq!(
            "v3".parse::<ReducedBlanking>(),
            Err(TimingError::UnknownReducedBlanking("v3".to_string()))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for rb in [
            ReducedBlanking::Off,
            ReducedBlanking::V1,
            ReducedBlanking::V2,
            ReducedBlanking::V2Video,
        ] {
            assert_eq!(rb.to_string().parse(), Ok(rb));
        }
    }

    #[test]
    fn test_cell_rnd_floors() {
        assert_eq!(cell_rnd(16.0, 9.0, 1080.0), 1920.0);
        assert_eq!(cell_rnd(4.0, 3.0, 1080.0), 1440.0);
        assert_eq!(cell_rnd(1.8, 100.0, 800.0), 8.0);
    }

    #[test]
    fn test_aspect_ratio_v_sync() {
        let cases = [
            (1024, 768, 4),
            (1920, 1080, 5),
            (1920, 1200, 6),
            (1280, 1024, 7),
            (1280, 768, 7),
            (1400, 768, 10),
        ];
        for (h, v, v_sync) in cases {
            let t = cvt(h, v, 60.0, ReducedBlanking::Off, false, false).unwrap();
            assert_eq!(t.v_sync, v_sync, "{}x{}", h, v);
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(C_PRIME, 30.0);
        assert_eq!(M_PRIME, 300.0);
        assert_eq!(CELL_GRAN, 8.0);
        assert_eq!(MARGIN_PERCENT, 1.8);
        assert_eq!(H_SYNC_PERCENT, 8.0);
    }

    #[test]
    fn test_narrower_than_one_cell() {
        assert_eq!(
            cvt(7, 480, 60.0, ReducedBlanking::Off, false, false),
            Err(TimingError::InvalidGeometry {
                h_active: 7,
                v_active: 480
            })
        );
    }
}
