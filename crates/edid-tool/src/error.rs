use edid_codec::EdidError;
use vesa_timing::TimingError;

/// Errors that can occur in the tool layer.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// I/O error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hex text with a character that is neither a digit nor whitespace.
    #[error("Invalid hex digit {ch:?} at offset {offset}")]
    InvalidHex { offset: usize, ch: char },

    /// Hex text that does not split into whole bytes.
    #[error("Hex input has an odd number of digits ({0})")]
    OddHexLength(usize),

    /// A generated timing value that a detailed timing cannot hold.
    #[error("{field} = {value} does not fit a detailed timing descriptor")]
    DtdRange { field: &'static str, value: u32 },

    /// JSON input that does not describe an EDID.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Edid(#[from] EdidError),

    #[error(transparent)]
    Timing(#[from] TimingError),
}
