//! # Hex Encoding/Decoding Utilities
//!
//! Enhanced hex encoding and decoding used for key configuration,
//! telegram fixtures, and debug logging of raw frames.
//!
//! ## Usage
//!
//! ```rust
//! use am550_rs::util::hex::{encode_hex, decode_hex};
//!
//! let data = [0x7E, 0xA0, 0x67];
//! let hex_str = encode_hex(&data);
//! assert_eq!(hex_str, "7ea067");
//!
//! let decoded = decode_hex(&hex_str).unwrap();
//! assert_eq!(decoded, data);
//! ```

use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Odd number of hex characters: {0}")]
    OddLength(usize),

    #[error("Empty hex string")]
    EmptyString,

    #[error("Hex decoding error: {0}")]
    DecodeError(String),
}

/// Encode bytes to lowercase hex string
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters.
/// Whitespace is automatically stripped.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    if hex_str.is_empty() {
        return Err(HexError::EmptyString);
    }

    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }

    hex::decode(&cleaned).map_err(|e| HexError::DecodeError(e.to_string()))
}

/// Helper for creating test data from hex strings
///
/// Panics on invalid hex (intended for test code only).
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    decode_hex(hex).expect("Invalid hex in test data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let data = vec![0x7E, 0xA0, 0x67, 0x03, 0x13, 0xDB, 0x08];
        let encoded = encode_hex(&data);
        let decoded = decode_hex(&encoded).unwrap();
        assert_eq!(data, decoded);
    }

    #[test]
    fn test_decode_with_whitespace() {
        let hex = "7e a0 67";
        let expected = vec![0x7E, 0xA0, 0x67];
        assert_eq!(decode_hex(hex).unwrap(), expected);
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode_hex("aBcD").unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_hex_to_bytes() {
        let data = hex_to_bytes("7ea067");
        assert_eq!(data, vec![0x7E, 0xA0, 0x67]);
    }

    #[test]
    fn test_errors() {
        assert!(decode_hex("").is_err());
        assert!(decode_hex("1").is_err()); // Odd length
        assert!(decode_hex("GG").is_err()); // Invalid character
    }
}
