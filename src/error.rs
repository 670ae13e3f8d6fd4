//! # AM550 Error Handling
//!
//! This module defines the error types used throughout the am550-rs crate:
//! [`DecodeError`] for the recoverable failures of the telegram decode
//! pipeline, and [`MeterError`] for everything the caller sees at the
//! crate boundary, including transport and configuration failures.

use thiserror::Error;

/// Recoverable failures of the telegram decode pipeline.
///
/// Every variant is handled at the orchestration boundary by discarding
/// the telegram and waiting for the next one; none is fatal to the
/// process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Stream desync, truncation, or read timeout while accumulating a
    /// telegram. The reader resynchronizes on the next call.
    #[error("Incomplete telegram: {length} bytes accumulated")]
    IncompleteFrame { length: usize },

    /// The recomputed frame check sequence does not match the one
    /// carried in the telegram. The telegram is discarded, not repaired.
    #[error("FCS mismatch: telegram carries {expected:04x}, calculated {calculated:04x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// The cipher rejected the input. CTR mode cannot reject ciphertext
    /// itself, so this indicates malformed input rather than a wrong key.
    #[error("Decryption failure: {reason}")]
    DecryptionFailure { reason: String },

    /// The decrypted payload is too short for a register field. Should
    /// not occur for a correctly sized telegram; indicates an upstream
    /// framing inconsistency.
    #[error("Register field out of range: need {needed} bytes of plaintext, got {actual}")]
    FieldOutOfRange { needed: usize, actual: usize },
}

/// Errors surfaced at the crate boundary.
#[derive(Error, Debug)]
pub enum MeterError {
    /// Serial port or byte-source I/O failure. Propagates to the
    /// caller's reconnection logic rather than being retried here.
    #[error("Serial port error: {0}")]
    SerialPort(String),

    /// The configured key does not decode to 16 bytes.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The configured key is not valid hexadecimal.
    #[error("Invalid hex key: {0}")]
    InvalidHexKey(String),

    /// A recoverable decode failure (see [`DecodeError`]).
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
