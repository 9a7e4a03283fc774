//! Modified UTF-8 as used by `CONSTANT_Utf8` entries.
//!
//! Differs from UTF-8 in two ways: NUL is encoded as `C0 80`, and
//! supplementary characters are encoded as two three-byte surrogates.

/// Decodes modified UTF-8. Returns `None` for malformed input.
pub(crate) fn decode(bytes: &[u8]) -> Option<String> {
    if bytes.iter().all(|&b| b != 0 && b < 0x80) {
        return String::from_utf8(bytes.to_vec()).ok();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = u16::from(bytes[i]);
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return None;
            }
            units.push(b0);
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, i + 1)?;
            units.push(((b0 & 0x1F) << 6) | b1);
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(bytes, i + 1)?;
            let b2 = continuation(bytes, i + 2)?;
            units.push(((b0 & 0x0F) << 12) | (b1 << 6) | b2);
            i += 3;
        } else {
            return None;
        }
    }
    String::from_utf16(&units).ok()
}

fn continuation(bytes: &[u8], at: usize) -> Option<u16> {
    let b = *bytes.get(at)?;
    (b & 0xC0 == 0x80).then_some(u16::from(b & 0x3F))
}

/// Encodes a string as modified UTF-8.
pub(crate) fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(low_byte(unit)),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | low_byte(unit >> 6));
                out.push(0x80 | low_byte(unit & 0x3F));
            }
            _ => {
                out.push(0xE0 | low_byte(unit >> 12));
                out.push(0x80 | low_byte((unit >> 6) & 0x3F));
                out.push(0x80 | low_byte(unit & 0x3F));
            }
        }
    }
    out
}

fn low_byte(value: u16) -> u8 {
    value.to_be_bytes()[1]
}
