//! Configuration type definitions
//!
//! Every tunable the device recognises lives here. Values are plain
//! integers/floats so they can be parsed from a flat TOML file without
//! allocation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of measurements kept in the history ring
pub const HISTORY_SIZE: usize = 100;

/// Largest raw value produced by a sensor reading (10-bit scale)
pub const ADC_MAX: u16 = 1023;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timing value that must be positive is zero
    ZeroDuration,
    /// Speed band is empty, inverted or not finite
    InvalidSpeedBand,
    /// Minimum sensor distance is not below the maximum
    InvalidDistanceRange,
    /// Threshold range is inverted or exceeds the ADC scale
    InvalidThresholdRange,
}

/// Loop and gesture timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Display redraw interval (ms)
    pub refresh_ms: u32,
    /// Time a button level must stay unchanged to be accepted (ms)
    pub debounce_ms: u32,
    /// Press duration that turns a press into a hold (ms)
    pub hold_ms: u32,
    /// Longest transit time accepted between the two gates (µs)
    pub max_measure_time_us: u32,
    /// How long the "unclear reading" notice stays on screen (ms)
    pub unclear_notice_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 250,
            debounce_ms: 30,
            hold_ms: 500,
            max_measure_time_us: 1_500_000,
            unclear_notice_ms: 2000,
        }
    }
}

/// Acceptance band for measured speeds (m/s, exclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedBand {
    pub min_mps: f32,
    pub max_mps: f32,
}

impl SpeedBand {
    /// Check whether a speed lies strictly inside the band
    pub fn contains(&self, speed_mps: f32) -> bool {
        speed_mps > self.min_mps && speed_mps < self.max_mps
    }
}

impl Default for SpeedBand {
    fn default() -> Self {
        Self {
            min_mps: 0.1,
            max_mps: 50.0,
        }
    }
}

/// Light-gate and potentiometer calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Gate separation at the distance pot's lowest position (mm)
    pub min_distance_mm: u16,
    /// Gate separation at the distance pot's highest position (mm)
    pub max_distance_mm: u16,
    /// Trigger threshold at the threshold pot's lowest position
    pub min_threshold: u16,
    /// Trigger threshold at the threshold pot's highest position
    pub max_threshold: u16,
    /// After a measurement, wait for both gates to clear before returning
    pub wait_for_clear: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            min_distance_mm: 100,
            max_distance_mm: 1000,
            min_threshold: 0,
            max_threshold: ADC_MAX,
            wait_for_clear: true,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightGateConfig {
    pub timing: TimingConfig,
    pub speed: SpeedBand,
    pub sensor: SensorConfig,
}

impl LightGateConfig {
    /// Check that all values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.refresh_ms == 0 || t.debounce_ms == 0 || t.hold_ms == 0 || t.max_measure_time_us == 0
        {
            return Err(ConfigError::ZeroDuration);
        }

        let band = &self.speed;
        if !band.min_mps.is_finite()
            || !band.max_mps.is_finite()
            || band.min_mps < 0.0
            || band.min_mps >= band.max_mps
        {
            return Err(ConfigError::InvalidSpeedBand);
        }

        let s = &self.sensor;
        if s.min_distance_mm >= s.max_distance_mm {
            return Err(ConfigError::InvalidDistanceRange);
        }
        if s.min_threshold > s.max_threshold || s.max_threshold > ADC_MAX {
            return Err(ConfigError::InvalidThresholdRange);
        }

        Ok(())
    }
}
