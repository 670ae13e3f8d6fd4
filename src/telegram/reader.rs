//! # Telegram Frame Reader
//!
//! Delimits raw telegrams in a continuous byte stream. The serial line
//! carries noise between telegrams (and may truncate one mid-push), so
//! synchronization runs as an explicit state machine keyed on the HDLC
//! flag byte: any `0x7E` restarts header accumulation from that byte,
//! which makes garbage and repeated flags self-correcting.
//!
//! Every read is wrapped in a timeout. A timeout or end of stream while
//! a telegram is being accumulated surfaces as
//! [`DecodeError::IncompleteFrame`]; the caller recovers by calling
//! [`FrameReader::read_frame`] again, which starts over in `Searching`.
//! No read buffer is retained across attempts.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

use crate::error::{DecodeError, MeterError};
use crate::telegram::frame::{self, RawFrame};
use crate::util::hex::encode_hex;

/// Synchronization states while hunting for the telegram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    /// Scanning for a flag byte.
    Searching,
    /// Flag seen; expecting the frame format byte.
    FormatExpected,
    /// Flag and format seen; expecting the length byte.
    LengthExpected,
}

impl SyncState {
    /// Header bytes already claimed by the current candidate telegram.
    fn accumulated(self) -> usize {
        match self {
            SyncState::Searching => 0,
            SyncState::FormatExpected => 1,
            SyncState::LengthExpected => 2,
        }
    }
}

/// Reads delimited telegrams from an async byte source.
///
/// The source is anything that yields bytes: a serial port, a TCP
/// stream, or an in-memory buffer in tests. One `FrameReader` serves one
/// stream; independent meters get independent readers.
pub struct FrameReader<R> {
    source: R,
    read_timeout: Duration,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap `source`, applying `read_timeout` to every read.
    pub fn new(source: R, read_timeout: Duration) -> Self {
        FrameReader {
            source,
            read_timeout,
        }
    }

    /// Read bytes until one complete telegram has been delimited.
    ///
    /// Blocks (asynchronously) until the header sequence has been seen
    /// and the 102-byte body collected, or until the stream times out,
    /// ends, or the accumulated bytes cannot form a telegram. All of
    /// the latter yield [`DecodeError::IncompleteFrame`]; I/O failures
    /// from the source itself yield [`MeterError::SerialPort`].
    pub async fn read_frame(&mut self) -> Result<RawFrame, MeterError> {
        self.synchronize().await?;

        let mut buf = [0u8; frame::FRAME_LEN];
        buf[..frame::HEADER.len()].copy_from_slice(&frame::HEADER);

        // Body: exactly 102 more bytes after the header.
        let mut filled = frame::HEADER.len();
        while filled < frame::FRAME_LEN {
            match self.read_some(&mut buf[filled..]).await? {
                Some(0) | None => {
                    log::warn!("Telegram truncated at {filled} bytes; discarding");
                    return Err(DecodeError::IncompleteFrame { length: filled }.into());
                }
                Some(n) => filled += n,
            }
        }

        if buf[frame::FRAME_LEN - 1] != frame::FLAG {
            log::warn!("Telegram does not end in a flag byte; discarding");
            return Err(DecodeError::IncompleteFrame { length: filled }.into());
        }

        log::debug!("Telegram received: {}", encode_hex(&buf));
        Ok(RawFrame::from_bytes(&buf)?)
    }

    /// Drive the synchronization state machine until the header
    /// sequence `7E A0 67` has been consumed from the stream.
    async fn synchronize(&mut self) -> Result<(), MeterError> {
        let mut state = SyncState::Searching;
        let mut discarded = 0usize;

        loop {
            let byte = match self.next_byte().await? {
                Some(byte) => byte,
                None => {
                    return Err(DecodeError::IncompleteFrame {
                        length: state.accumulated(),
                    }
                    .into());
                }
            };

            state = match state {
                SyncState::Searching => {
                    if byte == frame::FLAG {
                        SyncState::FormatExpected
                    } else {
                        discarded += 1;
                        SyncState::Searching
                    }
                }
                SyncState::FormatExpected => match byte {
                    frame::FORMAT => SyncState::LengthExpected,
                    // A fresh flag restarts the header from this byte;
                    // repeated flags are line noise, not a failure.
                    frame::FLAG => {
                        discarded += 1;
                        SyncState::FormatExpected
                    }
                    _ => {
                        discarded += 2;
                        SyncState::Searching
                    }
                },
                SyncState::LengthExpected => match byte {
                    frame::LENGTH => {
                        if discarded > 0 {
                            log::debug!("Resynchronized after {discarded} discarded bytes");
                        }
                        return Ok(());
                    }
                    frame::FLAG => {
                        discarded += 2;
                        SyncState::FormatExpected
                    }
                    _ => {
                        discarded += 3;
                        SyncState::Searching
                    }
                },
            };
        }
    }

    /// Read a single byte. `Ok(None)` means timeout or end of stream.
    async fn next_byte(&mut self) -> Result<Option<u8>, MeterError> {
        let mut byte = [0u8; 1];
        Ok(match self.read_some(&mut byte).await? {
            Some(0) | None => None,
            Some(_) => Some(byte[0]),
        })
    }

    /// One timed read from the source. `Ok(None)` is a timeout,
    /// `Ok(Some(0))` is end of stream.
    async fn read_some(&mut self, buf: &mut [u8]) -> Result<Option<usize>, MeterError> {
        match timeout(self.read_timeout, self.source.read(buf)).await {
            Ok(Ok(n)) => Ok(Some(n)),
            Ok(Err(e)) => Err(MeterError::SerialPort(e.to_string())),
            Err(_elapsed) => Ok(None),
        }
    }
}
