//! Detailed timing descriptors from generated timings.

use edid_codec::dtd::{DetailedTimingDescriptor, DtdTimings, Sync};
use vesa_timing::TimingParameterSet;

use crate::error::ToolError;

fn field_u16(field: &'static str, value: u32) -> Result<u16, ToolError> {
    u16::try_from(value).map_err(|_| ToolError::DtdRange { field, value })
}

fn field_u8(field: &'static str, value: u32) -> Result<u8, ToolError> {
    u8::try_from(value).map_err(|_| ToolError::DtdRange { field, value })
}

/// Build a detailed timing for `timing` with an image size in mm.
///
/// Vertical values describe one field, so interlaced modes carry half the
/// frame height and drop the half line of the odd field. Borders are kept
/// out of the blanking intervals. The sync is digital separate with the
/// generator's polarities.
pub fn dtd_from_timing(
    timing: &TimingParameterSet,
    h_size: u16,
    v_size: u16,
) -> Result<DetailedTimingDescriptor, ToolError> {
    let v_active = if timing.interlaced {
        timing.v_active / 2
    } else {
        timing.v_active
    };

    Ok(DetailedTimingDescriptor {
        timings: DtdTimings {
            pixel_clock: (timing.pixel_clock * 100.0).round() / 100.0,
            h_active: field_u16("h_active", timing.h_active)?,
            h_blank: field_u16("h_blank", timing.h_blank())?,
            v_active: field_u16("v_active", v_active)?,
            v_blank: field_u16("v_blank", timing.v_blank())?,
            h_front_porch: field_u16("h_front_porch", timing.h_front_porch)?,
            h_sync_pulse: field_u16("h_sync_pulse", timing.h_sync)?,
            v_front_porch: field_u16("v_front_porch", timing.v_front_porch as u32)?,
            v_sync_pulse: field_u16("v_sync_pulse", timing.v_sync)?,
        },
        h_size,
        v_size,
        h_borders: field_u8("h_borders", timing.border_left)?,
        v_borders: field_u8("v_borders", timing.border_top)?,
        interlaced: timing.interlaced,
        stereo: 0,
        sync: Sync::Digital {
            composite: false,
            serrations: None,
            v_sync_positive: Some(timing.v_sync_positive),
            h_sync_positive: timing.h_sync_positive,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edid_codec::dtd::{self, Slot};
    use vesa_timing::{cvt, gtf, GtfParams, ReducedBlanking};

    #[test]
    fn test_cvt_rb_1080p() {
        let t = cvt(1920, 1080, 60.0, ReducedBlanking::V1, false, false).unwrap();
        let d = dtd_from_timing(&t, 530, 300).unwrap();
        assert_eq!(d.timings.pixel_clock, 138.5);
        assert_eq!((d.timings.h_active, d.timings.h_blank), (1920, 160));
        assert_eq!((d.timings.v_active, d.timings.v_blank), (1080, 31));
        assert_eq!((d.timings.h_front_porch, d.timings.h_sync_pulse), (48, 32));
        assert_eq!((d.timings.v_front_porch, d.timings.v_sync_pulse), (3, 5));
        assert_eq!(
            d.sync,
            Sync::Digital {
                composite: false,
                serrations: None,
                v_sync_positive: Some(false),
                h_sync_positive: true,
            }
        );

        let bytes = dtd::encode(&d).unwrap();
        assert_eq!(dtd::decode(&bytes), Slot::Timing(d));
    }

    #[test]
    fn test_interlaced_uses_field_lines() {
        let t = gtf(1920, 1080, 60.0, true, false, &GtfParams::default()).unwrap();
        let d = dtd_from_timing(&t, 0, 0).unwrap();
        assert!(d.interlaced);
        assert_eq!(d.timings.v_active, 540);
        assert_eq!(d.timings.v_front_porch, 1);
        assert_eq!(d.timings.pixel_clock, 179.14);
    }

    #[test]
    fn test_borders_are_carried() {
        let t = cvt(800, 600, 60.0, ReducedBlanking::Off, false, true).unwrap();
        let d = dtd_from_timing(&t, 0, 0).unwrap();
        assert_eq!((d.h_borders, d.v_borders), (8, 10));
        assert_eq!(d.timings.h_blank, 224);
    }

    #[test]
    fn test_oversized_mode_is_rejected() {
        let t = cvt(70000, 480, 60.0, ReducedBlanking::V1, false, false).unwrap();
        assert!(matches!(
            dtd_from_timing(&t, 0, 0),
            Err(ToolError::DtdRange {
                field: "h_active",
                ..
            })
        ));
    }
}
