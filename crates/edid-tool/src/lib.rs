/// Error types for the tool layer.
pub mod error;

/// Hex dump parsing and formatting.
pub mod hex;

/// Human-readable EDID summaries.
pub mod inspect;

/// Detailed timing synthesis from CVT/GTF output.
pub mod synth;

pub use error::ToolError;

use edid_codec::{EdidError, EdidRecord};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Outcome of re-encoding a freshly decoded EDID.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundTrip {
    /// The writer reproduced the input byte for byte.
    Exact,
    /// The writer produced different bytes.
    Differs(Vec<u8>),
    /// The decoded record could not be written back.
    Unwritable(EdidError),
}

/// A decoded EDID together with its round-trip check.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub record: EdidRecord,
    /// The binary input after hex decoding.
    pub bytes: Vec<u8>,
    pub round_trip: RoundTrip,
}

/// Read a whole file, or standard input when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>, ToolError> {
    match path {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Decode raw or hex input and check that it survives a round trip.
pub fn decode(input: &[u8]) -> Result<Decoded, ToolError> {
    let bytes = hex::binary_from(input)?;
    let record = edid_codec::read(&bytes)?;
    let round_trip = match edid_codec::write(&record) {
        Ok(out) if out == bytes => RoundTrip::Exact,
        Ok(out) => RoundTrip::Differs(out),
        Err(e) => RoundTrip::Unwritable(e),
    };
    Ok(Decoded {
        record,
        bytes,
        round_trip,
    })
}

/// Serialize a decoded EDID as pretty JSON.
pub fn to_json(record: &EdidRecord) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Parse JSON produced by [`to_json`] (or written by hand) and encode it.
pub fn encode_json(json: &[u8]) -> Result<Vec<u8>, ToolError> {
    let record: EdidRecord = serde_json::from_slice(json)?;
    Ok(edid_codec::write(&record)?)
}
