//! ADC rescaling
//!
//! Thresholds and potentiometer ranges are expressed on a 10-bit scale.
//! Boards with a different ADC resolution shift their readings onto it.

use lightgate_core::config::ADC_MAX;
use lightgate_core::traits::{AnalogInput, SensorError, SensorReader};

/// Resolution of the reading scale used by the core
pub const READING_BITS: u8 = 10;

/// Raw ADC access for platform abstraction
pub trait AdcReader {
    /// Resolution of the raw readings in bits
    const RESOLUTION_BITS: u8;

    /// Sample one input at native resolution
    fn read_raw(&mut self, input: AnalogInput) -> Result<u16, SensorError>;
}

/// Shift a raw reading of `bits` resolution onto the 10-bit scale
pub fn rescale(raw: u16, bits: u8) -> u16 {
    let scaled = if bits >= READING_BITS {
        raw >> (bits - READING_BITS)
    } else {
        raw << (READING_BITS - bits)
    };
    scaled.min(ADC_MAX)
}

/// Sensor reader that rescales a native ADC
pub struct ScaledAdc<ADC> {
    adc: ADC,
}

impl<ADC: AdcReader> ScaledAdc<ADC> {
    pub fn new(adc: ADC) -> Self {
        Self { adc }
    }
}

impl<ADC: AdcReader> SensorReader for ScaledAdc<ADC> {
    fn read(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        let raw = self.adc.read_raw(input)?;
        Ok(rescale(raw, ADC::RESOLUTION_BITS))
    }
}
