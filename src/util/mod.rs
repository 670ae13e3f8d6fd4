//! # Utility Modules
//!
//! This module provides common utility functions used throughout the
//! am550-rs crate: bit mirroring for the HDLC frame check sequence and
//! hex encoding/decoding.

pub mod bitrev;
pub mod hex;

// Re-export commonly used functions
pub use bitrev::rev8;
pub use hex::{decode_hex, encode_hex, hex_to_bytes};
