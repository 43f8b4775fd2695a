//! One-byte block checksum.

use crate::EDID_BLOCK_SIZE;

/// Two's complement of the byte sum, so that `sum(bytes) + compute(bytes) == 0 (mod 256)`.
pub fn compute(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    sum.wrapping_neg()
}

/// True when the last byte of a 128-byte block is the checksum of the first 127.
///
/// Shorter input is never valid; bytes past the block are ignored.
pub fn validate(block: &[u8]) -> bool {
    if block.len() < EDID_BLOCK_SIZE {
        return false;
    }
    compute(&block[..EDID_BLOCK_SIZE - 1]) == block[EDID_BLOCK_SIZE - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_zero_block() {
        assert_eq!(compute(&[0u8; 127]), 0);
    }

    #[test]
    fn test_compute_wraps() {
        // 0xFF + 0x02 = 0x101 -> 0x01, complement 0xFF
        assert_eq!(compute(&[0xFF, 0x02]), 0xFF);
    }

    #[test]
    fn test_validate_round_trip() {
        let mut block = [0u8; 128];
        for (i, b) in block.iter_mut().enumerate().take(127) {
            *b = (i * 7) as u8;
        }
        block[127] = compute(&block[..127]);
        assert!(validate(&block));
        assert_eq!(compute(&block), 0);

        block[10] ^= 0x01;
        assert!(!validate(&block));
    }

    #[test]
    fn test_validate_short_block() {
        assert!(!validate(&[0u8; 64]));
    }
}
