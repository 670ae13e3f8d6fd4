//! # AM550 Telegram Decoding
//!
//! This module implements the decode pipeline for the DLMS/COSEM push
//! telegrams the AM550 emits on its customer interface:
//!
//! 1. [`reader::FrameReader`] delimits 105-byte telegrams in the serial
//!    byte stream, resynchronizing on the HDLC flag byte after noise.
//! 2. [`crc`] validates the telegram's frame check sequence (a mirrored
//!    CRC-16, the HDLC FCS).
//! 3. [`crypto`] derives the per-telegram initialization vector from the
//!    system title and invocation counter and decrypts the DLMS payload
//!    with AES-128-CTR.
//! 4. [`reading`] extracts the eight energy/power registers from the
//!    decrypted payload into a typed [`Reading`].
//!
//! [`decoder::TelegramDecoder`] orchestrates the pipeline and is the
//! entry point external collaborators call.

pub mod crc;
pub mod crypto;
pub mod decoder;
pub mod frame;
pub mod reader;
pub mod reading;

// Re-export the necessary types from the submodules
pub use crypto::AesKey;
pub use decoder::TelegramDecoder;
pub use frame::RawFrame;
pub use reader::FrameReader;
pub use reading::Reading;
