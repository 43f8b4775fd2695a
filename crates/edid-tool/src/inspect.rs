//! Human-readable summary of a decoded EDID.

use edid_codec::cvt_code::{self, CvtTimingCode};
use edid_codec::descriptor::Descriptor;
use edid_codec::dtd::DetailedTimingDescriptor;
use edid_codec::established::{established_iii_labels, established_labels};
use edid_codec::range_limits::{DisplayRangeLimits, RangeFormula};
use edid_codec::std_timing::{self, StandardTiming};
use edid_codec::types::{
    Chromaticity, EdidRecord, FeatureSupport, ManufactureDate, ScreenSize, VideoInput,
    COLOR_DEPTHS, COLOR_FORMATS, COLOR_TYPES, DVI_STANDARDS, SIGNAL_LEVELS, VIDEO_SETUPS,
};

/// Simplest fraction `p/q` within half a unit of `num/den` at scale `den`.
///
/// Walks the Stern-Brocot tree, so 16:10 comes out as 8:5 and 15:9 as 5:3.
/// Both arguments must be positive.
pub fn best_fraction(num: f64, den: f64) -> (u64, u64) {
    let num_low = num - 0.5;
    let num_high = num + 0.5;
    let (mut a, mut b) = (0u64, 1u64);
    let (mut c, mut d) = (1u64, 0u64);
    loop {
        let x = (a + c) as f64 * den;
        if x < (b + d) as f64 * num_low {
            a += c;
            b += d;
        } else if x >= (b + d) as f64 * num_high {
            c += a;
            d += b;
        } else {
            return (a + c, b + d);
        }
    }
}

fn flag(b: bool) -> u8 {
    b as u8
}

fn label(table: &[&'static str], index: u8) -> &'static str {
    table.get(index as usize).copied().unwrap_or("reserved")
}

pub fn video_input(vi: &VideoInput) -> String {
    match *vi {
        VideoInput::Analog {
            signal_level,
            video_setup,
            sync_type_support: st,
            serration_on_v,
        } => format!(
            "analog, signal_level ({}): {}, video_setup ({}): {}, sync_type_support: \
             separate_h_v {} : composite_on_h {} : composite_on_green {}, serration_on_v: {}",
            signal_level,
            label(&SIGNAL_LEVELS, signal_level),
            video_setup,
            label(&VIDEO_SETUPS, video_setup),
            flag(st.separate_h_v),
            flag(st.composite_on_h),
            flag(st.composite_on_green),
            flag(serration_on_v)
        ),
        VideoInput::Digital {
            color_depth,
            dvi_standard,
        } => format!(
            "digital, color_depth ({}): {}, dvi_standard ({}): {}",
            color_depth,
            label(&COLOR_DEPTHS, color_depth),
            dvi_standard,
            label(&DVI_STANDARDS, dvi_standard)
        ),
    }
}

pub fn screen_size(size: &ScreenSize) -> String {
    match *size {
        ScreenSize::Unknown => "screen size unknown".to_string(),
        ScreenSize::SizeCm { h_size, v_size } => format!("{} x {} cm", h_size, v_size),
        ScreenSize::AspectRatio { num, den, .. } => {
            let (n, d) = (num as f64, den as f64);
            let (p, q) = if num > den {
                best_fraction(n, d)
            } else {
                let (q, p) = best_fraction(d, n);
                (p, q)
            };
            format!("aspect ratio {}:{} ({}:{} ~ {:.4})", p, q, num, den, n / d)
        }
    }
}

pub fn feature_support(fs: &FeatureSupport) -> String {
    let pm = &fs.power_management;
    let color = match (fs.color_type, fs.color_format) {
        (Some(t), _) => format!("color_type ({}): {}", t, label(&COLOR_TYPES, t)),
        (None, Some(f)) => format!("color_format ({}): {}", f, label(&COLOR_FORMATS, f)),
        (None, None) => "color unspecified".to_string(),
    };
    format!(
        "power_management: standby {} : suspend {} : active_off {}, {}, sRGB: {}, \
         preferred_timing: {}, continuous_frequency: {}",
        flag(pm.standby),
        flag(pm.suspend),
        flag(pm.active_off),
        color,
        flag(fs.srgb),
        flag(fs.preferred_timing),
        flag(fs.continuous_frequency)
    )
}

pub fn chromaticity(c: &Chromaticity) -> String {
    format!(
        "red {:.3} {:.3}, green {:.3} {:.3}, blue {:.3} {:.3}, white {:.3} {:.3}",
        c.red_x, c.red_y, c.green_x, c.green_y, c.blue_x, c.blue_y, c.white_x, c.white_y
    )
}

pub fn standard_timing(t: &StandardTiming) -> String {
    let (num, den) = std_timing::ASPECT_RATIOS[(t.aspect_ratio & 0x03) as usize];
    format!(
        "h_active8: {}, aspect ({}): {}:{}, refresh_rate: {} -> {} x {} @ {}",
        t.h_active8,
        t.aspect_ratio,
        num,
        den,
        t.refresh_rate,
        t.h_active(),
        t.v_active(),
        t.refresh_rate
    )
}

fn detailed_timing(dtd: &DetailedTimingDescriptor) -> String {
    let t = &dtd.timings;
    format!(
        "{} x {}{} @ {:.2} MHz, h {}/{}/{}, v {}/{}/{}, {} x {} mm",
        t.h_active,
        t.v_active,
        if dtd.interlaced { "i" } else { "" },
        t.pixel_clock,
        t.h_front_porch,
        t.h_sync_pulse,
        t.h_blank.saturating_sub(t.h_front_porch + t.h_sync_pulse),
        t.v_front_porch,
        t.v_sync_pulse,
        t.v_blank.saturating_sub(t.v_front_porch + t.v_sync_pulse),
        dtd.h_size,
        dtd.v_size
    )
}

fn range_limits(rl: &DisplayRangeLimits) -> String {
    let formula = match &rl.formula {
        RangeFormula::Plain { timing_support, .. } => match timing_support {
            0 => ", default GTF".to_string(),
            1 => String::new(),
            other => format!(", timing support {:#04x}", other),
        },
        RangeFormula::SecondaryGtf(gtf) => format!(
            ", secondary GTF above {} kHz (C {}, M {}, K {}, J {})",
            gtf.h_rate_break, gtf.c, gtf.m, gtf.k, gtf.j
        ),
        RangeFormula::Cvt(cvt) => format!(
            ", CVT {}.{} up to {} MHz",
            cvt.version[0], cvt.version[1], cvt.max_pixel_clock
        ),
    };
    format!(
        "range limits v {}-{} Hz, h {}-{} kHz, max {} MHz{}",
        rl.v_min_rate, rl.v_max_rate, rl.h_min_rate, rl.h_max_rate, rl.max_pixel_clock, formula
    )
}

fn cvt_code_line(code: &CvtTimingCode) -> String {
    let (num, den) = cvt_code::ASPECT_RATIOS[(code.aspect_ratio & 0x03) as usize];
    format!(
        "{} lines {}:{} preferred {} Hz",
        code.v_active,
        num,
        den,
        cvt_code::PREFERRED_RATES[(code.preferred_v_rate & 0x03) as usize]
    )
}

pub fn descriptor(desc: &Descriptor) -> String {
    match desc {
        Descriptor::DetailedTiming(dtd) => format!("detailed timing {}", detailed_timing(dtd)),
        Descriptor::SerialNumber(s) => format!("serial number {:?}", s.serial_number),
        Descriptor::AlphanumericString(s) => format!("string {:?}", s.string),
        Descriptor::ProductName(s) => format!("product name {:?}", s.product_name),
        Descriptor::RangeLimits(rl) => range_limits(rl),
        Descriptor::EstablishedTimingsIII(et) => format!(
            "established timings III: {}",
            established_iii_labels(et.established_timings).join(", ")
        ),
        Descriptor::StandardTimings(ids) => format!(
            "standard timings: {}",
            ids.standard_timings
                .iter()
                .flatten()
                .map(|t| format!("{} x {} @ {}", t.h_active(), t.v_active(), t.refresh_rate))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Descriptor::CvtTimingCodes(codes) => format!(
            "CVT codes: {}",
            codes
                .cvt_codes
                .iter()
                .flatten()
                .map(cvt_code_line)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Descriptor::Opaque(raw) => format!("unknown descriptor, tag {:#04x}", raw[3]),
        Descriptor::Dummy(_) => "dummy".to_string(),
    }
}

/// One line per base block field group.
pub fn describe(record: &EdidRecord) -> Vec<String> {
    let mut lines = vec![
        format!(
            "manufacturer: {}, product_code: {:#06x}, serial_number: {}",
            record.manufacturer.code, record.product_code, record.serial_number
        ),
        match record.manufactured {
            ManufactureDate::ModelYear { year } => format!("model year: {}", year),
            ManufactureDate::MonthYear { month: 0, year } => format!("manufactured: {}", year),
            ManufactureDate::MonthYear { month, year } => {
                format!("manufactured: week {} of {}", month, year)
            }
        },
        format!(
            "edid_version: {}.{}",
            record.edid_version[0], record.edid_version[1]
        ),
        format!("video_input: {}", video_input(&record.video_input)),
        format!("screen_size: {}", screen_size(&record.screen_size)),
        match record.gamma {
            Some(gamma) => format!("gamma: {:.2}", gamma),
            None => "gamma: defined in extension".to_string(),
        },
        format!("feature_support: {}", feature_support(&record.feature_support)),
        format!("chromaticity: {}", chromaticity(&record.chromaticity)),
        format!(
            "established_timings: {}",
            established_labels(record.established_timings).join(", ")
        ),
    ];

    for (i, timing) in record.standard_timings.iter().enumerate() {
        if let Some(t) = timing {
            lines.push(format!("standard_timing[{}]: {}", i, standard_timing(t)));
        }
    }
    for (i, desc) in record.descriptors.iter().enumerate() {
        lines.push(format!("descriptor[{}]: {}", i, descriptor(desc)));
    }
    lines.push(format!("extensions: {}", record.extensions.len()));
    lines.push(format!(
        "checksum: {:#04x} ({})",
        record.checksum,
        if record.valid { "valid" } else { "INVALID" }
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_fraction() {
        assert_eq!(best_fraction(178.0, 100.0), (16, 9));
        assert_eq!(best_fraction(160.0, 100.0), (8, 5));
        assert_eq!(best_fraction(133.0, 100.0), (4, 3));
        assert_eq!(best_fraction(100.0, 100.0), (1, 1));
    }

    #[test]
    fn test_screen_size_aspect() {
        assert_eq!(
            screen_size(&ScreenSize::AspectRatio {
                num: 178,
                den: 100,
                portrait: false
            }),
            "aspect ratio 16:9 (178:100 ~ 1.7800)"
        );
        assert_eq!(
            screen_size(&ScreenSize::AspectRatio {
                num: 100,
                den: 178,
                portrait: true
            }),
            "aspect ratio 9:16 (100:178 ~ 0.5618)"
        );
        assert_eq!(
            screen_size(&ScreenSize::SizeCm {
                h_size: 60,
                v_size: 34
            }),
            "60 x 34 cm"
        );
    }

    #[test]
    fn test_standard_timing_line() {
        let t = StandardTiming {
            h_active8: 240,
            aspect_ratio: 3,
            refresh_rate: 60,
        };
        assert_eq!(
            standard_timing(&t),
            "h_active8: 240, aspect (3): 16:9, refresh_rate: 60 -> 1920 x 1080 @ 60"
        );
    }

    #[test]
    fn test_digital_video_input() {
        let vi = VideoInput::Digital {
            color_depth: 2,
            dvi_standard: 5,
        };
        assert_eq!(
            video_input(&vi),
            "digital, color_depth (2): 8 bits, dvi_standard (5): DisplayPort"
        );
        let reserved = VideoInput::Digital {
            color_depth: 7,
            dvi_standard: 9,
        };
        assert!(video_input(&reserved).ends_with("dvi_standard (9): reserved"));
    }

    #[test]
    fn test_descriptor_lines() {
        assert_eq!(
            descriptor(&Descriptor::product_name("LCD")),
            "product name \"LCD\""
        );
        assert_eq!(descriptor(&Descriptor::dummy()), "dummy");
        let mut raw = [0u8; 18];
        raw[3] = 0x42;
        assert_eq!(
            descriptor(&Descriptor::Opaque(raw)),
            "unknown descriptor, tag 0x42"
        );
    }
}
