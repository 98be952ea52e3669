use std::fmt::Write;

use eyre::{bail, eyre, Result};

/// Decodes a hex string into a vector of bytes. A leading `0x` and surrounding whitespace are
/// ignored.
///
/// ```
/// use evmext_common::utils::strings::decode_hex;
///
/// let hex = "48656c6c6f20576f726c64"; // "Hello World" in hex
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100]);
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    // normalize
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);

    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd number of digits");
    }

    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| eyre!("invalid hex string: {}", s))
}

/// Encodes a slice of bytes into a lowercase hex string, without a prefix.
///
/// ```
/// use evmext_common::utils::strings::encode_hex;
///
/// let bytes = vec![72, 101, 108, 108, 111, 32, 87, 111, 114, 108, 100];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "48656c6c6f20576f726c64");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::with_capacity(s.len() * 2), |mut acc, b| {
        // writing to a String cannot fail
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use crate::utils::strings::*;

    #[test]
    fn test_decode_hex_with_prefix() {
        assert_eq!(decode_hex("0x6001").expect("valid hex"), vec![0x60, 0x01]);
        assert_eq!(decode_hex("  0x6001\n").expect("valid hex"), vec![0x60, 0x01]);
    }

    #[test]
    fn test_decode_hex_empty() {
        assert!(decode_hex("").expect("valid hex").is_empty());
        assert!(decode_hex("0x").expect("valid hex").is_empty());
    }

    #[test]
    fn test_decode_hex_rejects_garbage() {
        assert!(decode_hex("0x600").is_err());
        assert!(decode_hex("zz").is_err());
        assert!(decode_hex("é1").is_err());
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(&[0x00, 0x5b, 0xff]), "005bff");
        assert_eq!(encode_hex(&[]), "");
    }
}
