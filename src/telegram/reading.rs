//! # Register Extraction
//!
//! The decrypted APDU carries eight registers at fixed byte offsets,
//! each a 4-byte big-endian unsigned integer. Energy registers arrive
//! in Wh/varh and are published in kWh/kvarh (divided by 1000); power
//! registers are reported as transmitted, in W/var.

use serde::Serialize;

use crate::error::DecodeError;

/// Width of one register field in bytes.
const REGISTER_WIDTH: usize = 4;

// Byte offsets of the register fields within the decrypted payload.
const POSITIVE_ACTIVE_ENERGY: usize = 35;
const NEGATIVE_ACTIVE_ENERGY: usize = 40;
const POSITIVE_REACTIVE_ENERGY: usize = 45;
const NEGATIVE_REACTIVE_ENERGY: usize = 50;
const POSITIVE_ACTIVE_POWER: usize = 55;
const NEGATIVE_ACTIVE_POWER: usize = 60;
const POSITIVE_REACTIVE_POWER: usize = 65;
const NEGATIVE_REACTIVE_POWER: usize = 70;

/// Shortest payload that still contains every register.
const MIN_PLAINTEXT_LEN: usize = NEGATIVE_REACTIVE_POWER + REGISTER_WIDTH;

/// Energy registers are scaled from Wh/varh to kWh/kvarh.
const ENERGY_SCALE: f64 = 1000.0;

/// One telegram's worth of meter registers.
///
/// Serializes with the field names downstream consumers key on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// Positive active energy (kWh)
    pub positive_active_energy: f64,
    /// Negative active energy (kWh)
    pub negative_active_energy: f64,
    /// Positive reactive energy (kvarh)
    pub positive_reactive_energy: f64,
    /// Negative reactive energy (kvarh)
    pub negative_reactive_energy: f64,
    /// Positive active power (W)
    pub positive_active_power: u32,
    /// Negative active power (W)
    pub negative_active_power: u32,
    /// Positive reactive power (var)
    pub positive_reactive_power: u32,
    /// Negative reactive power (var)
    pub negative_reactive_power: u32,
}

/// Extract the eight registers from a decrypted payload.
///
/// The length check guards against an upstream framing defect; a
/// correctly sized telegram always decrypts to enough payload.
pub fn extract(plaintext: &[u8]) -> Result<Reading, DecodeError> {
    if plaintext.len() < MIN_PLAINTEXT_LEN {
        return Err(DecodeError::FieldOutOfRange {
            needed: MIN_PLAINTEXT_LEN,
            actual: plaintext.len(),
        });
    }

    Ok(Reading {
        positive_active_energy: energy(plaintext, POSITIVE_ACTIVE_ENERGY),
        negative_active_energy: energy(plaintext, NEGATIVE_ACTIVE_ENERGY),
        positive_reactive_energy: energy(plaintext, POSITIVE_REACTIVE_ENERGY),
        negative_reactive_energy: energy(plaintext, NEGATIVE_REACTIVE_ENERGY),
        positive_active_power: register(plaintext, POSITIVE_ACTIVE_POWER),
        negative_active_power: register(plaintext, NEGATIVE_ACTIVE_POWER),
        positive_reactive_power: register(plaintext, POSITIVE_REACTIVE_POWER),
        negative_reactive_power: register(plaintext, NEGATIVE_REACTIVE_POWER),
    })
}

/// Read one big-endian register field. The caller has bounds-checked
/// the payload against `MIN_PLAINTEXT_LEN`.
fn register(plaintext: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; REGISTER_WIDTH];
    raw.copy_from_slice(&plaintext[offset..offset + REGISTER_WIDTH]);
    u32::from_be_bytes(raw)
}

fn energy(plaintext: &[u8], offset: usize) -> f64 {
    register(plaintext, offset) as f64 / ENERGY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with(offset: usize, value: u32) -> Vec<u8> {
        let mut payload = vec![0u8; MIN_PLAINTEXT_LEN];
        payload[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        payload
    }

    #[test]
    fn test_energy_scaled_by_thousand() {
        let payload = payload_with(POSITIVE_ACTIVE_ENERGY, 1_234_567);
        let reading = extract(&payload).unwrap();
        assert_eq!(reading.positive_active_energy, 1234.567);
    }

    #[test]
    fn test_power_unscaled() {
        let payload = payload_with(NEGATIVE_ACTIVE_POWER, 1_234_567);
        let reading = extract(&payload).unwrap();
        assert_eq!(reading.negative_active_power, 1_234_567);
    }

    #[test]
    fn test_all_registers_read_from_their_offsets() {
        let mut payload = vec![0u8; MIN_PLAINTEXT_LEN];
        for (i, offset) in [
            POSITIVE_ACTIVE_ENERGY,
            NEGATIVE_ACTIVE_ENERGY,
            POSITIVE_REACTIVE_ENERGY,
            NEGATIVE_REACTIVE_ENERGY,
            POSITIVE_ACTIVE_POWER,
            NEGATIVE_ACTIVE_POWER,
            POSITIVE_REACTIVE_POWER,
            NEGATIVE_REACTIVE_POWER,
        ]
        .into_iter()
        .enumerate()
        {
            let value = (i as u32 + 1) * 1000;
            payload[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        }

        let reading = extract(&payload).unwrap();
        assert_eq!(reading.positive_active_energy, 1.0);
        assert_eq!(reading.negative_active_energy, 2.0);
        assert_eq!(reading.positive_reactive_energy, 3.0);
        assert_eq!(reading.negative_reactive_energy, 4.0);
        assert_eq!(reading.positive_active_power, 5000);
        assert_eq!(reading.negative_active_power, 6000);
        assert_eq!(reading.positive_reactive_power, 7000);
        assert_eq!(reading.negative_reactive_power, 8000);
    }

    #[test]
    fn test_short_payload_rejected() {
        let payload = vec![0u8; MIN_PLAINTEXT_LEN - 1];
        let err = extract(&payload).unwrap_err();
        assert_eq!(
            err,
            DecodeError::FieldOutOfRange {
                needed: 74,
                actual: 73,
            }
        );
    }

    #[test]
    fn test_serializes_with_stable_field_names() {
        let reading = extract(&vec![0u8; MIN_PLAINTEXT_LEN]).unwrap();
        let json = serde_json::to_value(reading).unwrap();
        for key in [
            "positive_active_energy",
            "negative_active_energy",
            "positive_reactive_energy",
            "negative_reactive_energy",
            "positive_active_power",
            "negative_active_power",
            "positive_reactive_power",
            "negative_reactive_power",
        ] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
    }
}
