//! Bit-exact codec for the 128-byte EDID base block.
//!
//! [`read`] turns raw bytes into an [`EdidRecord`] and [`write`] turns it back.
//! Unknown descriptors and extension blocks are carried through as raw bytes,
//! so a decode followed by an encode reproduces the input exactly.

/// Block checksum.
pub mod checksum;

/// Base block reader and writer.
pub mod codec;

/// Three-byte CVT timing codes.
pub mod cvt_code;

/// 18-byte descriptor slots and the tag registry.
pub mod descriptor;

/// Detailed timing descriptors.
pub mod dtd;

/// Error types.
pub mod error;

/// Established timing bitmaps.
pub mod established;

/// Display range limits descriptor.
pub mod range_limits;

/// Two-byte standard timing codes.
pub mod std_timing;

/// Base block field types.
pub mod types;

pub use codec::{read, write};
pub use descriptor::Descriptor;
pub use dtd::{DetailedTimingDescriptor, DtdTimings, Sync};
pub use error::EdidError;
pub use established::{EstablishedTimings, EstablishedTimings3};
pub use range_limits::DisplayRangeLimits;
pub use std_timing::StandardTiming;
pub use types::EdidRecord;

/// Fixed header at the start of every base block.
pub const HEADER: [u8; 8] = [0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];

/// Size of the base block and of every extension block.
pub const EDID_BLOCK_SIZE: usize = 128;

/// Size of one descriptor slot.
pub const DESCRIPTOR_SIZE: usize = 18;
