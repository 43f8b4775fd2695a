//! The decoded EDID record.

use crate::descriptor::Descriptor;
use crate::established::EstablishedTimings;
use crate::std_timing::StandardTiming;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Three-letter PNP manufacturer id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ManufacturerId {
    /// Reserved top bit of byte 0x08.
    pub rsvd0: bool,
    /// Letters are 5-bit values offset by 64, so `'@'..='_'` are encodable.
    pub code: String,
}

/// Date of manufacture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ManufactureDate {
    /// Byte 0x10 is 0xFF: the year is a model year.
    ModelYear { year: u16 },
    /// `month` 0 means unspecified. EDID 1.4 calls this byte the week of manufacture.
    MonthYear { month: u8, year: u16 },
}

/// Sync types an analog input accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SyncTypeSupport {
    pub separate_h_v: bool,
    pub composite_on_h: bool,
    pub composite_on_green: bool,
}

/// Video input definition (byte 0x14).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)
)]
pub enum VideoInput {
    Analog {
        /// Index into [`SIGNAL_LEVELS`].
        signal_level: u8,
        /// 1 = blank-to-black setup (pedestal).
        video_setup: u8,
        sync_type_support: SyncTypeSupport,
        serration_on_v: bool,
    },
    Digital {
        /// Index into [`COLOR_DEPTHS`].
        color_depth: u8,
        /// Index into [`DVI_STANDARDS`].
        dvi_standard: u8,
    },
}

impl VideoInput {
    pub fn is_analog(&self) -> bool {
        matches!(self, VideoInput::Analog { .. })
    }
}

pub const SIGNAL_LEVELS: [&str; 4] = [
    "video 0.700 Vpp : sync 0.300 Vpp : total 1.000 Vpp",
    "video 0.714 Vpp : sync 0.286 Vpp : total 1.000 Vpp",
    "video 1.000 Vpp : sync 0.400 Vpp : total 1.400 Vpp",
    "video 0.700 Vpp : sync 0.000 Vpp : total 0.700 Vpp",
];

pub const VIDEO_SETUPS: [&str; 2] = ["blank level = black level", "blank-to-black setup / pedestal"];

pub const COLOR_DEPTHS: [&str; 8] = [
    "not defined",
    "6 bits",
    "8 bits",
    "10 bits",
    "12 bits",
    "14 bits",
    "16 bits",
    "reserved",
];

pub const DVI_STANDARDS: [&str; 6] = ["not defined", "DVI", "HDMI-a", "HDMI-b", "MDDI", "DisplayPort"];

/// Analog display color type, bits 4..3 of byte 0x18.
pub const COLOR_TYPES: [&str; 4] = [
    "monochrome / gray scale",
    "RGB color",
    "Non-RGB color",
    "not defined",
];

/// Digital color encodings, bits 4..3 of byte 0x18.
pub const COLOR_FORMATS: [&str; 4] = [
    "RGB 4:4:4",
    "RGB 4:4:4 + YCrCb 4:4:4",
    "RGB 4:4:4 + YCrCb 4:2:2",
    "RGB 4:4:4 + YCrCb 4:4:4 + YCrCb 4:2:2",
];

/// Screen size or aspect ratio (bytes 0x15, 0x16).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)
)]
pub enum ScreenSize {
    Unknown,
    /// Physical size in cm.
    SizeCm { h_size: u8, v_size: u8 },
    /// Landscape ratios read as `(b + 99):100`, portrait as `100:(b + 99)`.
    ///
    /// `portrait` records which byte carried the ratio. It only decides the
    /// encoding of a 1:1 ratio; any other ratio is written by its shape.
    AspectRatio {
        num: u16,
        den: u16,
        #[cfg_attr(feature = "serde", serde(default))]
        portrait: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct PowerManagement {
    pub standby: bool,
    pub suspend: bool,
    pub active_off: bool,
}

/// Feature support (byte 0x18).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct FeatureSupport {
    pub power_management: PowerManagement,
    /// Present for analog inputs.
    pub color_type: Option<u8>,
    /// Present for digital inputs.
    pub color_format: Option<u8>,
    pub srgb: bool,
    pub preferred_timing: bool,
    /// `use_gtf` in EDID 1.3.
    pub continuous_frequency: bool,
}

/// CIE xy coordinates with 10-bit precision (value / 1024).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct Chromaticity {
    pub red_x: f64,
    pub red_y: f64,
    pub green_x: f64,
    pub green_y: f64,
    pub blue_x: f64,
    pub blue_y: f64,
    pub white_x: f64,
    pub white_y: f64,
}

impl Chromaticity {
    /// Coordinates in byte order: red, green, blue, white; x before y.
    pub fn to_array(&self) -> [f64; 8] {
        [
            self.red_x,
            self.red_y,
            self.green_x,
            self.green_y,
            self.blue_x,
            self.blue_y,
            self.white_x,
            self.white_y,
        ]
    }

    pub fn from_array(v: [f64; 8]) -> Self {
        Self {
            red_x: v[0],
            red_y: v[1],
            green_x: v[2],
            green_y: v[3],
            blue_x: v[4],
            blue_y: v[5],
            white_x: v[6],
            white_y: v[7],
        }
    }
}

/// A decoded EDID: the base block plus raw extension blocks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct EdidRecord {
    pub manufacturer: ManufacturerId,
    pub product_code: u16,
    pub serial_number: u32,
    pub manufactured: ManufactureDate,
    /// Version and revision bytes.
    pub edid_version: [u8; 2],
    pub video_input: VideoInput,
    pub screen_size: ScreenSize,
    /// `None` when byte 0x17 is 0xFF.
    pub gamma: Option<f64>,
    pub feature_support: FeatureSupport,
    pub chromaticity: Chromaticity,
    pub established_timings: EstablishedTimings,
    pub standard_timings: [Option<StandardTiming>; 8],
    pub descriptors: [Descriptor; 4],
    /// Extension blocks, uninterpreted.
    pub extensions: Vec<Vec<u8>>,
    /// Checksum byte as read; written verbatim unless `valid` is set.
    pub checksum: u8,
    /// Whether the base block checksum is correct; the writer recomputes it when set.
    pub valid: bool,
}
