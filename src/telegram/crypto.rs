//! # Telegram Payload Decryption
//!
//! The AM550 encrypts the DLMS APDU with AES-128 in CTR mode. The
//! initialization vector is assembled fresh for every telegram from the
//! frame's system title and invocation counter plus a fixed four-byte
//! suffix. An IV must never repeat under a given key: CTR is a stream
//! cipher and a repeated keystream breaks confidentiality outright. The
//! meter guarantees this by incrementing the invocation counter per
//! telegram; this module never caches or reuses an IV.
//!
//! CTR mode cannot authenticate: a wrong key or corrupted IV is not
//! detected here and produces garbage plaintext, which the register
//! extractor may flag as a secondary signal.

use std::fmt;

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{DecodeError, MeterError};
use crate::telegram::frame::RawFrame;
use crate::util::hex::decode_hex;

type Aes128Ctr = Ctr128BE<Aes128>;

/// Fixed suffix completing the 16-byte initialization vector.
const IV_SUFFIX: [u8; 4] = [0x00, 0x00, 0x00, 0x02];

/// The pre-shared AES-128 key handed out by the meter operator.
///
/// Supplied once at startup and immutable for the process lifetime.
/// Zeroized on drop; never printed.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    key: [u8; 16],
}

impl AesKey {
    /// Create a key from a 16-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MeterError> {
        if bytes.len() != 16 {
            return Err(MeterError::InvalidKeyLength {
                expected: 16,
                actual: bytes.len(),
            });
        }

        let mut key = [0u8; 16];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Create a key from a hex string, as supplied in configuration.
    pub fn from_hex(hex_str: &str) -> Result<Self, MeterError> {
        let bytes = decode_hex(hex_str).map_err(|e| MeterError::InvalidHexKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Get key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.key
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.write_str("AesKey(..)")
    }
}

/// Build the per-telegram initialization vector:
/// system title, invocation counter, `00 00 00 02`.
pub fn build_iv(system_title: &[u8; 8], invocation_counter: &[u8; 4]) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[0..8].copy_from_slice(system_title);
    iv[8..12].copy_from_slice(invocation_counter);
    iv[12..16].copy_from_slice(&IV_SUFFIX);
    iv
}

/// Decrypt the telegram's ciphertext region.
///
/// CTR mode needs no padding; the plaintext has exactly the length of
/// the ciphertext.
pub fn decrypt(frame: &RawFrame, key: &AesKey) -> Result<Vec<u8>, DecodeError> {
    let iv = build_iv(&frame.system_title(), &frame.invocation_counter());
    let mut plaintext = frame.ciphertext().to_vec();

    let mut cipher = Aes128Ctr::new(key.as_bytes().into(), &iv.into());
    cipher
        .try_apply_keystream(&mut plaintext)
        .map_err(|e| DecodeError::DecryptionFailure {
            reason: e.to_string(),
        })?;

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::frame::{FLAG, FRAME_LEN, HEADER};

    fn frame_with(system_title: [u8; 8], invocation_counter: [u8; 4]) -> RawFrame {
        let mut bytes = vec![0u8; FRAME_LEN];
        bytes[..3].copy_from_slice(&HEADER);
        bytes[14..22].copy_from_slice(&system_title);
        bytes[24..28].copy_from_slice(&invocation_counter);
        bytes[FRAME_LEN - 1] = FLAG;
        RawFrame::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_key_from_bytes() {
        let key_bytes = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
            0x0F, 0x10,
        ];
        let key = AesKey::from_bytes(&key_bytes).unwrap();
        assert_eq!(key.as_bytes(), &key_bytes);
    }

    #[test]
    fn test_key_from_hex() {
        let key = AesKey::from_hex("0102030405060708090A0B0C0D0E0F10").unwrap();
        assert_eq!(key.as_bytes()[0], 0x01);
        assert_eq!(key.as_bytes()[15], 0x10);
    }

    #[test]
    fn test_invalid_key_length() {
        let result = AesKey::from_bytes(&[0; 15]);
        match result {
            Err(MeterError::InvalidKeyLength { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            _ => panic!("Expected InvalidKeyLength error"),
        }
    }

    #[test]
    fn test_invalid_hex_key() {
        assert!(matches!(
            AesKey::from_hex("not hex at all"),
            Err(MeterError::InvalidHexKey(_))
        ));
    }

    #[test]
    fn test_iv_construction() {
        let system_title = [0x49, 0x53, 0x4B, 0x69, 0x74, 0x02, 0x37, 0x1D];
        let invocation_counter = [0x00, 0x00, 0x5A, 0x31];

        let iv = build_iv(&system_title, &invocation_counter);

        // IV layout: system title (8) + invocation counter (4) + suffix (4)
        assert_eq!(&iv[0..8], &system_title);
        assert_eq!(&iv[8..12], &invocation_counter);
        assert_eq!(&iv[12..16], &[0x00, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn test_iv_unique_per_invocation_counter() {
        let system_title = [0x49, 0x53, 0x4B, 0x69, 0x74, 0x02, 0x37, 0x1D];
        let first = build_iv(&system_title, &[0x00, 0x00, 0x00, 0x01]);
        let second = build_iv(&system_title, &[0x00, 0x00, 0x00, 0x02]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_decrypt_preserves_length() {
        let key = AesKey::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        let frame = frame_with(*b"IskraST1", [0, 0, 0, 7]);
        let plaintext = decrypt(&frame, &key).unwrap();
        assert_eq!(plaintext.len(), frame.ciphertext().len());
    }

    #[test]
    fn test_decrypt_depends_on_invocation_counter() {
        // Same key and ciphertext but a different counter must yield a
        // different keystream.
        let key = AesKey::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        let first = decrypt(&frame_with(*b"IskraST1", [0, 0, 0, 1]), &key).unwrap();
        let second = decrypt(&frame_with(*b"IskraST1", [0, 0, 0, 2]), &key).unwrap();
        assert_ne!(first, second);
    }
}
