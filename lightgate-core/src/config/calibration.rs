//! Potentiometer calibration
//!
//! The gate separation and the trigger threshold are set with two
//! potentiometers. Their raw readings are mapped linearly onto the
//! configured ranges every time a measurement starts.

use super::types::{SensorConfig, ADC_MAX};

/// Linearly map `value` from `in_min..=in_max` onto `out_min..=out_max`
///
/// The input is clamped to its range first, so the result never leaves the
/// output range. A degenerate input range maps everything to `out_min`.
pub fn map_range(value: u16, in_min: u16, in_max: u16, out_min: u16, out_max: u16) -> u16 {
    if in_max <= in_min {
        return out_min;
    }

    let value = value.clamp(in_min, in_max);
    let span_in = (in_max - in_min) as i64;
    let span_out = out_max as i64 - out_min as i64;
    let offset = (value - in_min) as i64;

    (out_min as i64 + offset * span_out / span_in) as u16
}

/// Calibration values in effect for one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Gate separation (mm)
    pub distance_mm: u16,
    /// Readings below this value mean the beam is interrupted
    pub threshold: u16,
}

impl Calibration {
    /// Build from raw potentiometer readings
    pub fn from_raw(config: &SensorConfig, distance_raw: u16, threshold_raw: u16) -> Self {
        Self {
            distance_mm: map_range(
                distance_raw,
                0,
                ADC_MAX,
                config.min_distance_mm,
                config.max_distance_mm,
            ),
            threshold: map_range(
                threshold_raw,
                0,
                ADC_MAX,
                config.min_threshold,
                config.max_threshold,
            ),
        }
    }

    /// Check whether a gate reading means "object present"
    pub fn is_triggered(&self, reading: u16) -> bool {
        reading < self.threshold
    }
}
