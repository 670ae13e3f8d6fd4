//! # Telegram Decoder
//!
//! Orchestrates the decode pipeline: shape check, FCS validation,
//! decryption, register extraction. The first failing stage
//! short-circuits with its [`DecodeError`]; the decoder itself holds
//! the pre-shared key and nothing else, so decoding one telegram never
//! affects the next.

use tokio::io::AsyncRead;

use crate::error::{DecodeError, MeterError};
use crate::telegram::crc;
use crate::telegram::crypto::{self, AesKey};
use crate::telegram::frame::RawFrame;
use crate::telegram::reader::FrameReader;
use crate::telegram::reading::{self, Reading};

/// Decodes delimited telegrams into readings.
pub struct TelegramDecoder {
    key: AesKey,
}

impl TelegramDecoder {
    /// Create a decoder with the pre-shared meter key.
    pub fn new(key: AesKey) -> Self {
        TelegramDecoder { key }
    }

    /// Decode one delimited telegram into a reading.
    ///
    /// # Arguments
    /// * `bytes` - A complete telegram as delimited on the wire
    ///
    /// # Returns
    /// * `Ok(Reading)` - The telegram's eight register values
    /// * `Err(DecodeError)` - The first pipeline stage that rejected it
    pub fn decode(&self, bytes: &[u8]) -> Result<Reading, DecodeError> {
        let frame = RawFrame::from_bytes(bytes)?;
        self.decode_frame(&frame)
    }

    /// Decode an already-delimited frame.
    pub fn decode_frame(&self, frame: &RawFrame) -> Result<Reading, DecodeError> {
        crc::validate(frame)?;
        let plaintext = crypto::decrypt(frame, &self.key)?;
        reading::extract(&plaintext)
    }

    /// Read the next telegram from `reader` and decode it.
    ///
    /// Recoverable decode failures surface as [`MeterError::Decode`];
    /// the caller reports them and reads on.
    pub async fn next_reading<R>(&self, reader: &mut FrameReader<R>) -> Result<Reading, MeterError>
    where
        R: AsyncRead + Unpin,
    {
        let frame = reader.read_frame().await?;
        Ok(self.decode_frame(&frame)?)
    }
}
