//! # AM550 Serial Communication
//!
//! Opens the meter's customer interface port and bundles the frame
//! reader and telegram decoder into a connection handle. Reconnection
//! and backoff stay with the caller; a failed read surfaces and the
//! handle can simply be dropped and reopened.

use std::time::Duration;

use tokio_serial::SerialPortBuilderExt;

use crate::error::MeterError;
use crate::telegram::{AesKey, FrameReader, Reading, TelegramDecoder};

/// Configuration for the serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        // The customer interface pushes telegrams at 9600 8N1 every few
        // seconds; ten seconds covers the longest gap between pushes.
        SerialConfig {
            baudrate: 9600,
            timeout: Duration::from_secs(10),
        }
    }
}

/// A connected meter: serial port, frame reader, and decoder.
pub struct MeterConnection {
    reader: FrameReader<tokio_serial::SerialStream>,
    decoder: TelegramDecoder,
}

impl MeterConnection {
    /// Open `port_name` with default settings and the given key.
    pub async fn connect(port_name: &str, key: AesKey) -> Result<MeterConnection, MeterError> {
        Self::connect_with_config(port_name, key, SerialConfig::default()).await
    }

    /// Open `port_name` with custom serial settings.
    pub async fn connect_with_config(
        port_name: &str,
        key: AesKey,
        config: SerialConfig,
    ) -> Result<MeterConnection, MeterError> {
        let port = tokio_serial::new(port_name, config.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .timeout(config.timeout)
            .open_native_async()
            .map_err(|e| MeterError::SerialPort(e.to_string()))?;

        Ok(MeterConnection {
            reader: FrameReader::new(port, config.timeout),
            decoder: TelegramDecoder::new(key),
        })
    }

    /// Receive and decode the next telegram.
    ///
    /// # Returns
    /// * `Ok(Reading)` - The next telegram's register values
    /// * `Err(MeterError::Decode)` - A recoverable decode failure; skip
    ///   it and call again
    /// * `Err(MeterError::SerialPort)` - The link failed; reconnect
    pub async fn recv_reading(&mut self) -> Result<Reading, MeterError> {
        self.decoder.next_reading(&mut self.reader).await
    }
}
