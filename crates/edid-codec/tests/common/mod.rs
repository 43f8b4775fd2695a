//! Shared fixtures for the codec integration tests.

#![allow(dead_code)]

use edid_codec::checksum;

pub const DTD_1080P: [u8; 18] = [
    0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0xFE, 0x1F, 0x11,
    0x00, 0x00, 0x1E,
];

pub const RANGE_LIMITS: [u8; 18] = [
    0x00, 0x00, 0x00, 0xFD, 0x00, 0x38, 0x4C, 0x1E, 0x53, 0x11, 0x00, 0x0A, 0x20, 0x20, 0x20,
    0x20, 0x20, 0x20,
];

pub fn text_descriptor(tag: u8, payload: &[u8; 13]) -> [u8; 18] {
    let mut slot = [0u8; 18];
    slot[3] = tag;
    slot[5..].copy_from_slice(payload);
    slot
}

pub fn extension_block() -> Vec<u8> {
    let mut ext = vec![0u8; 128];
    ext[0] = 0x02;
    ext[1] = 0x03;
    ext[2] = 0x04;
    ext[4] = 0x47;
    ext[127] = 0x5A;
    ext
}

/// A 1080p digital monitor with one CTA extension block.
pub fn sample_edid() -> Vec<u8> {
    let mut b = vec![0u8; 128];
    b[..8].copy_from_slice(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00]);
    b[0x08..0x0A].copy_from_slice(&[0x10, 0xAC]);
    b[0x0A..0x0C].copy_from_slice(&[0xA0, 0x41]);
    b[0x0C..0x10].copy_from_slice(&[0x04, 0x03, 0x02, 0x01]);
    b[0x10] = 0x0C;
    b[0x11] = 0x1C;
    b[0x12] = 0x01;
    b[0x13] = 0x04;
    b[0x14] = 0xA5;
    b[0x15] = 0x3C;
    b[0x16] = 0x22;
    b[0x17] = 0x78;
    b[0x18] = 0x3A;
    b[0x19..0x23]
        .copy_from_slice(&[0xEE, 0x91, 0xA3, 0x54, 0x4C, 0x99, 0x26, 0x0F, 0x50, 0x54]);
    b[0x23..0x26].copy_from_slice(&[0x20, 0x08, 0x00]);
    b[0x26..0x36].copy_from_slice(&[
        0xD1, 0xC0, 0x81, 0x80, 0x81, 0x40, 0x71, 0x4F, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
        0x01,
    ]);
    b[0x36..0x48].copy_from_slice(&DTD_1080P);
    b[0x48..0x5A].copy_from_slice(&RANGE_LIMITS);
    b[0x5A..0x6C].copy_from_slice(&text_descriptor(0xFC, b"DELL U2718Q\n "));
    b[0x6C..0x7E].copy_from_slice(&text_descriptor(0xFF, b"ABC123456789\n"));
    b[0x7E] = 1;
    b[0x7F] = checksum::compute(&b[..0x7F]);
    b.extend_from_slice(&extension_block());
    b
}
