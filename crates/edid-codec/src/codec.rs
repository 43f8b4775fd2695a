//! Base block reader and writer.

use crate::checksum;
use crate::descriptor;
use crate::error::{check_range, check_width, quantize, EdidError};
use crate::established::EstablishedTimings;
use crate::std_timing;
use crate::types::{
    Chromaticity, EdidRecord, FeatureSupport, ManufactureDate, ManufacturerId, PowerManagement,
    ScreenSize, SyncTypeSupport, VideoInput,
};
use crate::{DESCRIPTOR_SIZE, EDID_BLOCK_SIZE, HEADER};

const DESCRIPTORS_OFFSET: usize = 0x36;
const STANDARD_TIMINGS_OFFSET: usize = 0x26;
const EXTENSION_COUNT_OFFSET: usize = 0x7e;
const YEAR_BASE: u16 = 1990;

/// Decode an EDID base block and its extension blocks.
///
/// A wrong checksum is reported through [`EdidRecord::valid`], not as an error.
pub fn read(buf: &[u8]) -> Result<EdidRecord, EdidError> {
    if buf.len() < EDID_BLOCK_SIZE {
        return Err(EdidError::TooShort { len: buf.len() });
    }
    if buf[..8] != HEADER {
        return Err(EdidError::BadHeader);
    }
    let extensions = buf[EXTENSION_COUNT_OFFSET];
    let expected = EDID_BLOCK_SIZE * (1 + extensions as usize);
    if buf.len() != expected {
        return Err(EdidError::LengthMismatch {
            extensions,
            expected,
            actual: buf.len(),
        });
    }

    let base = &buf[..EDID_BLOCK_SIZE];
    let valid = checksum::validate(base);
    if !valid {
        log::warn!(
            "EDID checksum mismatch: stored {:#04x}, expected {:#04x}",
            base[0x7f],
            checksum::compute(&base[..0x7f])
        );
    }

    let video_input = decode_video_input(base[0x14]);
    let analog = video_input.is_analog();

    let mut standard_timings = [None; 8];
    for (i, slot) in standard_timings.iter_mut().enumerate() {
        let at = STANDARD_TIMINGS_OFFSET + 2 * i;
        *slot = std_timing::decode([base[at], base[at + 1]]);
    }

    let descriptors = std::array::from_fn(|i| {
        let at = DESCRIPTORS_OFFSET + DESCRIPTOR_SIZE * i;
        let mut slot = [0u8; DESCRIPTOR_SIZE];
        slot.copy_from_slice(&base[at..at + DESCRIPTOR_SIZE]);
        descriptor::decode_slot(&slot)
    });

    Ok(EdidRecord {
        manufacturer: decode_manufacturer(base[0x08], base[0x09]),
        product_code: u16::from_le_bytes([base[0x0a], base[0x0b]]),
        serial_number: u32::from_le_bytes([base[0x0c], base[0x0d], base[0x0e], base[0x0f]]),
        manufactured: if base[0x10] == 0xff {
            ManufactureDate::ModelYear {
                year: base[0x11] as u16 + YEAR_BASE,
            }
        } else {
            ManufactureDate::MonthYear {
                month: base[0x10],
                year: base[0x11] as u16 + YEAR_BASE,
            }
        },
        edid_version: [base[0x12], base[0x13]],
        video_input,
        screen_size: decode_screen_size(base[0x15], base[0x16]),
        gamma: (base[0x17] != 0xff).then(|| (base[0x17] as f64 + 100.0) / 100.0),
        feature_support: decode_feature_support(base[0x18], analog),
        chromaticity: decode_chromaticity(&base[0x19..0x23]),
        established_timings: EstablishedTimings::from_bytes([base[0x23], base[0x24], base[0x25]]),
        standard_timings,
        descriptors,
        extensions: buf[EDID_BLOCK_SIZE..]
            .chunks_exact(EDID_BLOCK_SIZE)
            .map(<[u8]>::to_vec)
            .collect(),
        checksum: base[0x7f],
        valid,
    })
}

/// Encode a record into the base block followed by its extension blocks.
///
/// Fails as a whole if any field does not fit its layout.
pub fn write(record: &EdidRecord) -> Result<Vec<u8>, EdidError> {
    let mut base = [0u8; EDID_BLOCK_SIZE];
    base[..8].copy_from_slice(&HEADER);

    let [m0, m1] = encode_manufacturer(&record.manufacturer)?;
    base[0x08] = m0;
    base[0x09] = m1;
    base[0x0a..0x0c].copy_from_slice(&record.product_code.to_le_bytes());
    base[0x0c..0x10].copy_from_slice(&record.serial_number.to_le_bytes());

    let (week, year) = match record.manufactured {
        ManufactureDate::ModelYear { year } => (0xff, year),
        ManufactureDate::MonthYear { month, year } => {
            (check_range("manufactured.month", month as u32, 0, 0xfe)? as u8, year)
        }
    };
    base[0x10] = week;
    base[0x11] = (check_range(
        "manufactured.year",
        year as u32,
        YEAR_BASE as u32,
        YEAR_BASE as u32 + 255,
    )? - YEAR_BASE as u32) as u8;

    base[0x12] = record.edid_version[0];
    base[0x13] = record.edid_version[1];
    base[0x14] = encode_video_input(&record.video_input)?;

    let [s0, s1] = encode_screen_size(&record.screen_size)?;
    base[0x15] = s0;
    base[0x16] = s1;

    base[0x17] = match record.gamma {
        Some(gamma) => quantize_gamma(gamma)?,
        None => 0xff,
    };
    base[0x18] = encode_feature_support(&record.feature_support, record.video_input.is_analog())?;
    base[0x19..0x23].copy_from_slice(&encode_chromaticity(&record.chromaticity)?);
    base[0x23..0x26].copy_from_slice(&record.established_timings.to_bytes());

    for (i, timing) in record.standard_timings.iter().enumerate() {
        let at = STANDARD_TIMINGS_OFFSET + 2 * i;
        base[at..at + 2].copy_from_slice(&std_timing::encode(timing.as_ref())?);
    }

    for (i, desc) in record.descriptors.iter().enumerate() {
        let at = DESCRIPTORS_OFFSET + DESCRIPTOR_SIZE * i;
        base[at..at + DESCRIPTOR_SIZE].copy_from_slice(&descriptor::encode_slot(desc, i)?);
    }

    if record.extensions.len() > 255 {
        return Err(EdidError::TooManyExtensions(record.extensions.len()));
    }
    base[EXTENSION_COUNT_OFFSET] = record.extensions.len() as u8;
    base[0x7f] = if record.valid {
        checksum::compute(&base[..0x7f])
    } else {
        record.checksum
    };

    let mut out = Vec::with_capacity(EDID_BLOCK_SIZE * (1 + record.extensions.len()));
    out.extend_from_slice(&base);
    for (index, ext) in record.extensions.iter().enumerate() {
        if ext.len() != EDID_BLOCK_SIZE {
            return Err(EdidError::ExtensionSize {
                index,
                len: ext.len(),
            });
        }
        out.extend_from_slice(ext);
    }
    Ok(out)
}

fn decode_manufacturer(b0: u8, b1: u8) -> ManufacturerId {
    let letters = [
        (b0 >> 2) & 0x1f,
        ((b0 << 3) | (b1 >> 5)) & 0x1f,
        b1 & 0x1f,
    ];
    ManufacturerId {
        rsvd0: b0 & 0x80 != 0,
        code: letters.iter().map(|&l| (l + 64) as char).collect(),
    }
}

fn encode_manufacturer(id: &ManufacturerId) -> Result<[u8; 2], EdidError> {
    let letters = id
        .code
        .chars()
        .map(|ch| match ch {
            '@'..='_' => Ok(ch as u8 - 64),
            _ => Err(EdidError::Manufacturer(id.code.clone())),
        })
        .collect::<Result<Vec<u8>, _>>()?;
    let &[a, b, c] = letters.as_slice() else {
        return Err(EdidError::Manufacturer(id.code.clone()));
    };
    Ok([
        (if id.rsvd0 { 0x80 } else { 0 }) | (a << 2) | (b >> 3),
        ((b & 0x07) << 5) | c,
    ])
}

fn decode_video_input(b: u8) -> VideoInput {
    if b & 0x80 == 0 {
        VideoInput::Analog {
            signal_level: (b >> 5) & 0x03,
            video_setup: (b >> 4) & 0x01,
            sync_type_support: SyncTypeSupport {
                separate_h_v: b & 0x08 != 0,
                composite_on_h: b & 0x04 != 0,
                composite_on_green: b & 0x02 != 0,
            },
            serration_on_v: b & 0x01 != 0,
        }
    } else {
        VideoInput::Digital {
            color_depth: (b >> 4) & 0x07,
            dvi_standard: b & 0x0f,
        }
    }
}

fn encode_video_input(vi: &VideoInput) -> Result<u8, EdidError> {
    Ok(match *vi {
        VideoInput::Analog {
            signal_level,
            video_setup,
            sync_type_support: sts,
            serration_on_v,
        } => {
            let level = check_width("video_input.signal_level", signal_level as u32, 2)? as u8;
            let setup = check_width("video_input.video_setup", video_setup as u32, 1)? as u8;
            (level << 5)
                | (setup << 4)
                | (if sts.separate_h_v { 0x08 } else { 0 })
                | (if sts.composite_on_h { 0x04 } else { 0 })
                | (if sts.composite_on_green { 0x02 } else { 0 })
                | (if serration_on_v { 0x01 } else { 0 })
        }
        VideoInput::Digital {
            color_depth,
            dvi_standard,
        } => {
            let depth = check_width("video_input.color_depth", color_depth as u32, 3)? as u8;
            let dvi = check_width("video_input.dvi_standard", dvi_standard as u32, 4)? as u8;
            0x80 | (depth << 4) | dvi
        }
    })
}

fn decode_screen_size(h: u8, v: u8) -> ScreenSize {
    match (h, v) {
        (0, 0) => ScreenSize::Unknown,
        (h, 0) => ScreenSize::AspectRatio {
            num: h as u16 + 99,
            den: 100,
            portrait: false,
        },
        (0, v) => ScreenSize::AspectRatio {
            num: 100,
            den: v as u16 + 99,
            portrait: true,
        },
        (h_size, v_size) => ScreenSize::SizeCm { h_size, v_size },
    }
}

fn encode_screen_size(size: &ScreenSize) -> Result<[u8; 2], EdidError> {
    Ok(match *size {
        ScreenSize::Unknown => [0, 0],
        ScreenSize::SizeCm { h_size, v_size } => {
            check_range("screen_size.h_size", h_size as u32, 1, 255)?;
            check_range("screen_size.v_size", v_size as u32, 1, 255)?;
            [h_size, v_size]
        }
        ScreenSize::AspectRatio { num, den, portrait } => {
            check_range("screen_size.num", num as u32, 1, u16::MAX as u32)?;
            check_range("screen_size.den", den as u32, 1, u16::MAX as u32)?;
            // 1:1 fits either byte.
            if num > den || (num == den && !portrait) {
                let b = quantize("screen_size.aspect_ratio", num as f64 / den as f64, 100.0, 100, 354)?;
                [(b - 99) as u8, 0]
            } else {
                let b = quantize("screen_size.aspect_ratio", den as f64 / num as f64, 100.0, 100, 354)?;
                [0, (b - 99) as u8]
            }
        }
    })
}

fn quantize_gamma(gamma: f64) -> Result<u8, EdidError> {
    let stored = (gamma * 100.0 - 100.0).round();
    if !(0.0..=254.0).contains(&stored) {
        return Err(EdidError::FieldRange {
            field: "gamma",
            value: gamma,
            min: 1.0,
            max: 3.54,
        });
    }
    Ok(stored as u8)
}

fn decode_feature_support(b: u8, analog: bool) -> FeatureSupport {
    let color = (b >> 3) & 0x03;
    FeatureSupport {
        power_management: PowerManagement {
            standby: b & 0x80 != 0,
            suspend: b & 0x40 != 0,
            active_off: b & 0x20 != 0,
        },
        color_type: analog.then_some(color),
        color_format: (!analog).then_some(color),
        srgb: b & 0x04 != 0,
        preferred_timing: b & 0x02 != 0,
        continuous_frequency: b & 0x01 != 0,
    }
}

fn encode_feature_support(fs: &FeatureSupport, analog: bool) -> Result<u8, EdidError> {
    let color = if analog {
        fs.color_type
            .ok_or(EdidError::MissingField("feature_support.color_type"))?
    } else {
        fs.color_format
            .ok_or(EdidError::MissingField("feature_support.color_format"))?
    };
    let color = check_width("feature_support.color", color as u32, 2)? as u8;
    let pm = &fs.power_management;
    Ok((if pm.standby { 0x80 } else { 0 })
        | (if pm.suspend { 0x40 } else { 0 })
        | (if pm.active_off { 0x20 } else { 0 })
        | (color << 3)
        | (if fs.srgb { 0x04 } else { 0 })
        | (if fs.preferred_timing { 0x02 } else { 0 })
        | (if fs.continuous_frequency { 0x01 } else { 0 }))
}

/// `bytes` is the 10-byte range 0x19..0x23: two bytes of packed low bits,
/// then the high 8 bits of each coordinate.
fn decode_chromaticity(bytes: &[u8]) -> Chromaticity {
    let values = std::array::from_fn(|i| {
        let low = (bytes[i / 4] >> (6 - 2 * (i % 4))) & 0x03;
        (((bytes[2 + i] as u16) << 2) | low as u16) as f64 / 1024.0
    });
    Chromaticity::from_array(values)
}

fn encode_chromaticity(c: &Chromaticity) -> Result<[u8; 10], EdidError> {
    let mut out = [0u8; 10];
    for (i, value) in c.to_array().into_iter().enumerate() {
        let q = quantize("chromaticity", value, 1024.0, 0, 1023)?;
        out[i / 4] |= ((q & 0x03) as u8) << (6 - 2 * (i % 4));
        out[2 + i] = (q >> 2) as u8;
    }
    Ok(out)
}
