/// Errors that can occur while reading or writing an EDID.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EdidError {
    /// Input is shorter than one base block.
    #[error("EDID too short: {len} bytes, need at least 128")]
    TooShort { len: usize },

    /// The fixed 8-byte header is missing.
    #[error("EDID header mismatch")]
    BadHeader,

    /// Total length disagrees with the extension count at offset 0x7E.
    #[error("EDID length mismatch: {extensions} extension block(s) require {expected} bytes, got {actual}")]
    LengthMismatch {
        extensions: u8,
        expected: usize,
        actual: usize,
    },

    /// A field value does not fit its packed bit width.
    #[error("{field} = {value} is outside {min}..={max}")]
    FieldRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A field required by the selected variant is absent.
    #[error("{0} is required for this video input type")]
    MissingField(&'static str),

    /// Manufacturer id is not three letters in the 5-bit alphabet.
    #[error("Invalid manufacturer id {0:?}")]
    Manufacturer(String),

    /// Descriptor text longer than the 13-byte payload.
    #[error("Descriptor string {0:?} is longer than 13 bytes")]
    StringTooLong(String),

    /// Descriptor text containing a character outside Latin-1.
    #[error("Descriptor string {value:?} contains non Latin-1 character {ch:?}")]
    NonLatin1 { value: String, ch: char },

    /// Descriptor text shorter than 13 bytes with a `0x0A` inside it.
    #[error("Descriptor string {0:?} contains a line feed before its end")]
    EmbeddedTerminator(String),

    /// No layout accepted the descriptor value.
    #[error("Descriptor {slot} matches no known layout")]
    UnmatchedDescriptor { slot: usize },

    /// Range limits selector contradicts the nested payload.
    #[error("Range limits timing_support {0:#04x} is reserved for a dedicated payload")]
    SelectorConflict(u8),

    /// Extension block with the wrong size.
    #[error("Extension block {index} is {len} bytes, expected 128")]
    ExtensionSize { index: usize, len: usize },

    /// More extensions than the one-byte count can express.
    #[error("{0} extension blocks exceed the limit of 255")]
    TooManyExtensions(usize),
}

/// Check that `value` fits in `width` bits.
pub(crate) fn check_width(field: &'static str, value: u32, width: u32) -> Result<u32, EdidError> {
    let max = (1u32 << width) - 1;
    check_range(field, value, 0, max)
}

/// Check that `value` lies in `min..=max`.
pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<u32, EdidError> {
    if value < min || value > max {
        return Err(EdidError::FieldRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(value)
}

/// Round `value * scale` to the nearest integer and check it against `min..=max`.
pub(crate) fn quantize(
    field: &'static str,
    value: f64,
    scale: f64,
    min: u32,
    max: u32,
) -> Result<u32, EdidError> {
    let scaled = (value * scale).round();
    if !scaled.is_finite() || scaled < min as f64 || scaled > max as f64 {
        return Err(EdidError::FieldRange {
            field,
            value,
            min: min as f64 / scale,
            max: max as f64 / scale,
        });
    }
    Ok(scaled as u32)
}
