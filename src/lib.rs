//! # am550-rs - A Rust Crate for Iskraemeco AM550 Smart Meter Telegrams
//!
//! The am550-rs crate decodes the encrypted DLMS/COSEM push telegrams that
//! the Iskraemeco AM550 electricity meter (as deployed by Wiener Netze)
//! emits on its customer interface.
//!
//! ## Features
//!
//! - Synchronize on telegram boundaries in a noisy serial byte stream
//! - Validate each telegram's frame check sequence (mirrored CRC-16)
//! - Decrypt the DLMS payload with AES-128-CTR and the per-telegram IV
//! - Extract the eight energy and power registers into a typed reading
//! - Connect to the meter's customer interface over a serial port
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! To use the am550-rs crate in your Rust project, add the following to
//! your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! am550-rs = "0.1.0"
//! ```
//!
//! Then connect to the meter and stream readings:
//!
//! ```rust,no_run
//! use am550_rs::{connect, AesKey, MeterError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MeterError> {
//!     let key = AesKey::from_hex("00112233445566778899aabbccddeeff")?;
//!     let mut meter = connect("/dev/ttyUSB0", key).await?;
//!     loop {
//!         match meter.recv_reading().await {
//!             Ok(reading) => println!("{} kWh", reading.positive_active_energy),
//!             Err(MeterError::Decode(e)) => eprintln!("telegram discarded: {e}"),
//!             Err(e) => return Err(e),
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod logging;
pub mod serial;
pub mod telegram;
pub mod util;

pub use crate::error::{DecodeError, MeterError};
pub use crate::logging::{init_logger, log_info};

// Core telegram types
pub use serial::{MeterConnection, SerialConfig};
pub use telegram::{AesKey, FrameReader, RawFrame, Reading, TelegramDecoder};

/// Connect to the meter's customer interface via serial port.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
/// * `key` - The pre-shared AES-128 key for this meter
///
/// # Returns
/// * `Ok(MeterConnection)` - Connected handle for receiving readings
/// * `Err(MeterError)` - Connection failed
pub async fn connect(port: &str, key: AesKey) -> Result<MeterConnection, MeterError> {
    MeterConnection::connect(port, key).await
}
