//! The four 18-byte descriptor slots and the display-descriptor registry.
//!
//! A slot holds either a detailed timing or a display descriptor tagged by
//! byte 3. Display descriptors are dispatched through [`REGISTRY`]; anything
//! the registry rejects is kept as [`Descriptor::Opaque`] and written back
//! unchanged.

use crate::cvt_code::{self, CvtTimingCode};
use crate::dtd::{self, DetailedTimingDescriptor, Slot};
use crate::error::EdidError;
use crate::established::EstablishedTimings3;
use crate::range_limits::{self, DisplayRangeLimits};
use crate::std_timing::{self, StandardTiming};
use crate::DESCRIPTOR_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Payload length of the text descriptors.
pub const TEXT_LEN: usize = 13;

/// One descriptor slot.
///
/// With serde, each variant is recognised by its field names alone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Descriptor {
    DetailedTiming(DetailedTimingDescriptor),
    SerialNumber(SerialNumber),
    AlphanumericString(AlphanumericString),
    ProductName(ProductName),
    RangeLimits(DisplayRangeLimits),
    EstablishedTimingsIII(EstablishedTimingsIII),
    StandardTimings(StandardTimingIds),
    CvtTimingCodes(CvtTimingCodes),
    /// Raw bytes of a slot the codec does not interpret.
    Opaque([u8; DESCRIPTOR_SIZE]),
    Dummy(Dummy),
}

/// Dummy descriptor (tag 0x10), used as padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct Dummy {}

/// Display serial number (tag 0xFF).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SerialNumber {
    pub serial_number: String,
}

/// Alphanumeric data string (tag 0xFE).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct AlphanumericString {
    pub string: String,
}

/// Display product name (tag 0xFC).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ProductName {
    pub product_name: String,
}

/// Established timings III (tag 0xF7).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct EstablishedTimingsIII {
    /// Mode flags; the low 4 bits are reserved.
    pub established_timings: EstablishedTimings3,
    /// Reserved bytes 0x0C..0x10.
    pub rsvd1: [u8; 5],
}

/// Six additional standard timings (tag 0xFA).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct StandardTimingIds {
    pub standard_timings: [Option<StandardTiming>; 6],
}

/// Four CVT 3-byte timing codes (tag 0xF8); `None` marks an all-zero code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CvtTimingCodes {
    pub cvt_codes: [Option<CvtTimingCode>; 4],
}

impl Descriptor {
    pub fn serial_number(text: impl Into<String>) -> Self {
        Self::SerialNumber(SerialNumber {
            serial_number: text.into(),
        })
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::AlphanumericString(AlphanumericString {
            string: text.into(),
        })
    }

    pub fn product_name(text: impl Into<String>) -> Self {
        Self::ProductName(ProductName {
            product_name: text.into(),
        })
    }

    pub fn dummy() -> Self {
        Self::Dummy(Dummy {})
    }
}

/// Reader/writer pair for one display descriptor tag.
pub struct DescriptorType {
    pub tag: u8,
    pub name: &'static str,
    /// `None` when the payload does not fit this layout.
    pub decode: fn(&[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor>,
    /// `None` when the value is not of this type.
    pub encode: fn(&Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>>,
}

/// Known display descriptors, tried in this order when writing.
pub static REGISTRY: &[DescriptorType] = &[
    DescriptorType {
        tag: 0x10,
        name: "dummy",
        decode: decode_dummy,
        encode: encode_dummy,
    },
    DescriptorType {
        tag: 0xFF,
        name: "serial number",
        decode: decode_serial_number,
        encode: encode_serial_number,
    },
    DescriptorType {
        tag: 0xFE,
        name: "alphanumeric string",
        decode: decode_string,
        encode: encode_string,
    },
    DescriptorType {
        tag: range_limits::TAG,
        name: "display range limits",
        decode: decode_range_limits,
        encode: encode_range_limits,
    },
    DescriptorType {
        tag: 0xFC,
        name: "product name",
        decode: decode_product_name,
        encode: encode_product_name,
    },
    DescriptorType {
        tag: 0xFA,
        name: "standard timing identifiers",
        decode: decode_standard_timings,
        encode: encode_standard_timings,
    },
    DescriptorType {
        tag: 0xF8,
        name: "CVT 3-byte timing codes",
        decode: decode_cvt_codes,
        encode: encode_cvt_codes,
    },
    DescriptorType {
        tag: 0xF7,
        name: "established timings III",
        decode: decode_established_iii,
        encode: encode_established_iii,
    },
];

/// Registry entry for `tag`.
pub fn lookup(tag: u8) -> Option<&'static DescriptorType> {
    REGISTRY.iter().find(|t| t.tag == tag)
}

/// Decode one 18-byte slot, falling back to opaque bytes.
pub fn decode_slot(buf: &[u8; DESCRIPTOR_SIZE]) -> Descriptor {
    match dtd::decode(buf) {
        Slot::Timing(timing) => Descriptor::DetailedTiming(timing),
        Slot::Display => {
            let decoded = lookup(buf[3]).and_then(|t| {
                let res = (t.decode)(buf);
                if res.is_none() {
                    log::debug!("{} descriptor has an unexpected payload, keeping raw bytes", t.name);
                }
                res
            });
            decoded.unwrap_or_else(|| {
                log::debug!("Display descriptor tag {:#04x} kept as raw bytes", buf[3]);
                Descriptor::Opaque(*buf)
            })
        }
        Slot::Unknown => {
            log::debug!("Slot with zero pixel clock and byte 2 = {:#04x} kept as raw bytes", buf[2]);
            Descriptor::Opaque(*buf)
        }
    }
}

/// Encode the descriptor in slot `slot`.
pub fn encode_slot(desc: &Descriptor, slot: usize) -> Result<[u8; DESCRIPTOR_SIZE], EdidError> {
    match desc {
        Descriptor::DetailedTiming(timing) => dtd::encode(timing),
        Descriptor::Opaque(raw) => Ok(*raw),
        other => REGISTRY
            .iter()
            .find_map(|t| (t.encode)(other))
            .unwrap_or(Err(EdidError::UnmatchedDescriptor { slot })),
    }
}

fn header(tag: u8) -> [u8; DESCRIPTOR_SIZE] {
    let mut buf = [0u8; DESCRIPTOR_SIZE];
    buf[3] = tag;
    buf
}

fn decode_dummy(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    buf[4..].iter().all(|&b| b == 0).then(Descriptor::dummy)
}

fn encode_dummy(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    match desc {
        Descriptor::Dummy(_) => Some(Ok(header(0x10))),
        _ => None,
    }
}

/// Text payload of bytes 5..18. A `0x0A` terminator followed only by
/// spaces is stripped; any other payload is returned whole.
fn decode_text(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<String> {
    if buf[4] != 0 {
        return None;
    }
    let payload = &buf[5..];
    let text = match payload.iter().position(|&b| b == 0x0A) {
        Some(end) if payload[end + 1..].iter().all(|&b| b == b' ') => &payload[..end],
        _ => payload,
    };
    Some(text.iter().map(|&b| b as char).collect())
}

fn encode_text(tag: u8, text: &str) -> Result<[u8; DESCRIPTOR_SIZE], EdidError> {
    let bytes = text
        .chars()
        .map(|ch| {
            u8::try_from(ch).map_err(|_| EdidError::NonLatin1 {
                value: text.to_string(),
                ch,
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;
    if bytes.len() > TEXT_LEN {
        return Err(EdidError::StringTooLong(text.to_string()));
    }
    // A full-length payload carries no terminator, so any byte may appear.
    if bytes.len() < TEXT_LEN && bytes.contains(&0x0A) {
        return Err(EdidError::EmbeddedTerminator(text.to_string()));
    }

    let mut buf = header(tag);
    buf[5..].fill(b' ');
    buf[5..5 + bytes.len()].copy_from_slice(&bytes);
    if bytes.len() < TEXT_LEN {
        buf[5 + bytes.len()] = 0x0A;
    }
    Ok(buf)
}

fn decode_serial_number(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    decode_text(buf).map(Descriptor::serial_number)
}

fn encode_serial_number(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    match desc {
        Descriptor::SerialNumber(s) => Some(encode_text(0xFF, &s.serial_number)),
        _ => None,
    }
}

fn decode_string(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    decode_text(buf).map(Descriptor::string)
}

fn encode_string(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    match desc {
        Descriptor::AlphanumericString(s) => Some(encode_text(0xFE, &s.string)),
        _ => None,
    }
}

fn decode_product_name(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    decode_text(buf).map(Descriptor::product_name)
}

fn encode_product_name(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    match desc {
        Descriptor::ProductName(s) => Some(encode_text(0xFC, &s.product_name)),
        _ => None,
    }
}

fn decode_range_limits(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    Some(Descriptor::RangeLimits(range_limits::decode(buf)))
}

fn encode_range_limits(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    match desc {
        Descriptor::RangeLimits(rl) => Some(range_limits::encode(rl)),
        _ => None,
    }
}

fn decode_standard_timings(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    if buf[4] != 0 || buf[17] != 0x0A {
        return None;
    }
    let mut standard_timings = [None; 6];
    for (i, slot) in standard_timings.iter_mut().enumerate() {
        *slot = std_timing::decode([buf[5 + 2 * i], buf[6 + 2 * i]]);
    }
    Some(Descriptor::StandardTimings(StandardTimingIds { standard_timings }))
}

fn encode_standard_timings(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    let Descriptor::StandardTimings(ids) = desc else {
        return None;
    };
    let mut buf = header(0xFA);
    for (i, timing) in ids.standard_timings.iter().enumerate() {
        match std_timing::encode(timing.as_ref()) {
            Ok(bytes) => buf[5 + 2 * i..7 + 2 * i].copy_from_slice(&bytes),
            Err(e) => return Some(Err(e)),
        }
    }
    buf[17] = 0x0A;
    Some(Ok(buf))
}

fn decode_cvt_codes(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    if buf[4] != 0 || buf[5] != 0x01 {
        return None;
    }
    let mut cvt_codes = [None; 4];
    for (i, slot) in cvt_codes.iter_mut().enumerate() {
        let bytes = [buf[6 + 3 * i], buf[7 + 3 * i], buf[8 + 3 * i]];
        if bytes != [0; 3] {
            *slot = Some(cvt_code::decode(bytes));
        }
    }
    Some(Descriptor::CvtTimingCodes(CvtTimingCodes { cvt_codes }))
}

fn encode_cvt_codes(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    let Descriptor::CvtTimingCodes(codes) = desc else {
        return None;
    };
    let mut buf = header(0xF8);
    buf[5] = 0x01;
    for (i, code) in codes.cvt_codes.iter().enumerate() {
        if let Some(code) = code {
            match cvt_code::encode(code) {
                Ok(bytes) => buf[6 + 3 * i..9 + 3 * i].copy_from_slice(&bytes),
                Err(e) => return Some(Err(e)),
            }
        }
    }
    Some(Ok(buf))
}

fn decode_established_iii(buf: &[u8; DESCRIPTOR_SIZE]) -> Option<Descriptor> {
    if buf[4] != 0 || buf[5] != 0x0A || buf[17] != 0 {
        return None;
    }
    let mut timings = [0u8; 6];
    timings.copy_from_slice(&buf[6..12]);
    let mut rsvd1 = [0u8; 5];
    rsvd1.copy_from_slice(&buf[12..17]);
    Some(Descriptor::EstablishedTimingsIII(EstablishedTimingsIII {
        established_timings: EstablishedTimings3::from_bytes(timings),
        rsvd1,
    }))
}

fn encode_established_iii(desc: &Descriptor) -> Option<Result<[u8; DESCRIPTOR_SIZE], EdidError>> {
    let Descriptor::EstablishedTimingsIII(et) = desc else {
        return None;
    };
    let mut buf = header(0xF7);
    buf[5] = 0x0A;
    buf[6..12].copy_from_slice(&et.established_timings.to_bytes());
    buf[12..17].copy_from_slice(&et.rsvd1);
    Some(Ok(buf))
}
