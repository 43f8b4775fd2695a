//! Hex text helpers for EDID dumps.
//!
//! EDIDs are often passed around as hex dumps (`xxd -p`, `edid-decode`,
//! sysfs copies pasted into bug reports), so every input accepts either form.

use crate::error::ToolError;

fn is_hex_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// True if `buf` is non-empty and holds only hex digits and whitespace.
pub fn is_hex_text(buf: &[u8]) -> bool {
    !buf.is_empty()
        && buf
            .iter()
            .all(|&b| b.is_ascii_hexdigit() || is_hex_whitespace(b))
}

/// Decode hex text, ignoring whitespace anywhere in the input.
pub fn from_hex(text: &[u8]) -> Result<Vec<u8>, ToolError> {
    let mut digits = Vec::with_capacity(text.len());
    for (offset, &b) in text.iter().enumerate() {
        if is_hex_whitespace(b) {
            continue;
        }
        let nibble = (b as char).to_digit(16).ok_or(ToolError::InvalidHex {
            offset,
            ch: b as char,
        })?;
        digits.push(nibble as u8);
    }
    if digits.len() % 2 != 0 {
        return Err(ToolError::OddHexLength(digits.len()));
    }
    Ok(digits.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect())
}

/// Accept either raw bytes or a hex dump of them.
pub fn binary_from(input: &[u8]) -> Result<Vec<u8>, ToolError> {
    if is_hex_text(input) {
        from_hex(input)
    } else {
        Ok(input.to_vec())
    }
}

/// Format bytes as lowercase hex, 16 space-separated bytes per line.
pub fn hex16(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|line| {
            line.iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex_text() {
        assert!(is_hex_text(b"00ffFF\n 0a"));
        assert!(!is_hex_text(b""));
        assert!(!is_hex_text(b"00 xx"));
        assert!(!is_hex_text(&[0x00, 0xff, 0xff]));
    }

    #[test]
    fn test_from_hex_ignores_whitespace() {
        assert_eq!(from_hex(b"00 ff\r\n\tA5").unwrap(), vec![0x00, 0xff, 0xa5]);
        assert_eq!(from_hex(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_from_hex_errors() {
        assert!(matches!(from_hex(b"abc"), Err(ToolError::OddHexLength(3))));
        assert!(matches!(
            from_hex(b"0g"),
            Err(ToolError::InvalidHex { offset: 1, ch: 'g' })
        ));
    }

    #[test]
    fn test_binary_from() {
        assert_eq!(binary_from(b"0102").unwrap(), vec![1, 2]);
        assert_eq!(binary_from(&[0, 1, 2]).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_hex16_layout() {
        let bytes: Vec<u8> = (0..20).collect();
        let text = hex16(&bytes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 47);
        assert_eq!(lines[1], "10 11 12 13");
        assert_eq!(from_hex(text.as_bytes()).unwrap(), bytes);
    }
}
