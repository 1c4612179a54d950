//! Two-gate transit timing
//!
//! An object first interrupts one beam, then the other. The time between
//! the two interruptions and the calibrated gate separation give the speed.
//! The wait for the second beam is a busy loop on the microsecond clock,
//! bounded by the configured measurement window.

use crate::channel::Channel;
use crate::config::{Calibration, LightGateConfig, SensorConfig};
use crate::state::{DeviceState, SensorFault};
use crate::traits::{AnalogInput, Clock, SensorError, SensorReader};

/// Outcome of one measurement poll
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    /// Neither gate is interrupted
    NoTrigger,
    /// Both gates fired in order within the window
    Speed {
        /// Speed in m/s (not yet checked against the speed band)
        speed_mps: f32,
        /// Transit time between the gates (µs)
        elapsed_us: u64,
        /// Gate that fired first
        first: Channel,
    },
    /// The first gate fired and cleared again, the second never fired
    Ambiguous { first: Channel },
    /// A gate was still blocked when the window closed
    Timeout(SensorFault),
    /// In a sensor error state and both gates read clear again
    SensorsCleared,
}

/// Live sensor values for the settings screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LiveReadings {
    pub distance_mm: u16,
    pub threshold: u16,
    pub left: u16,
    pub right: u16,
}

/// Speed in m/s for a transit of `elapsed_us` over `distance_mm`
///
/// A zero transit time is treated as 1 µs.
pub fn speed_mps(distance_mm: u16, elapsed_us: u64) -> f32 {
    let elapsed_us = elapsed_us.max(1) as f32;
    distance_mm as f32 * (1_000_000.0 / elapsed_us) / 1000.0
}

/// Speed measurement engine
#[derive(Debug, Clone, Copy)]
pub struct SpeedEngine {
    sensor: SensorConfig,
    max_measure_time_us: u64,
}

impl SpeedEngine {
    pub fn new(config: &LightGateConfig) -> Self {
        Self {
            sensor: config.sensor,
            max_measure_time_us: config.timing.max_measure_time_us as u64,
        }
    }

    /// Read both potentiometers and map them onto the configured ranges
    pub fn calibration<S: SensorReader>(&self, sensors: &mut S) -> Result<Calibration, SensorError> {
        let distance_raw = sensors.read(AnalogInput::DistancePot)?;
        let threshold_raw = sensors.read(AnalogInput::ThresholdPot)?;
        Ok(Calibration::from_raw(&self.sensor, distance_raw, threshold_raw))
    }

    /// Sample everything the settings screens show
    pub fn readings<S: SensorReader>(&self, sensors: &mut S) -> Result<LiveReadings, SensorError> {
        let cal = self.calibration(sensors)?;
        Ok(LiveReadings {
            distance_mm: cal.distance_mm,
            threshold: cal.threshold,
            left: sensors.read_gate(Channel::Left)?,
            right: sensors.read_gate(Channel::Right)?,
        })
    }

    /// Poll the gates once and, if one fired, time the transit
    ///
    /// Blocks for at most two measurement windows: one waiting for the
    /// second gate and, with `wait_for_clear`, one waiting for both gates to
    /// clear afterwards.
    pub fn measure<C: Clock, S: SensorReader>(
        &self,
        clock: &mut C,
        sensors: &mut S,
        state: DeviceState,
    ) -> Result<Measurement, SensorError> {
        let cal = self.calibration(sensors)?;

        for first in Channel::ALL {
            if cal.is_triggered(sensors.read_gate(first)?) {
                return self.time_transit(clock, sensors, &cal, first);
            }
        }

        if state.is_sensor_error() {
            Ok(Measurement::SensorsCleared)
        } else {
            Ok(Measurement::NoTrigger)
        }
    }

    fn time_transit<C: Clock, S: SensorReader>(
        &self,
        clock: &mut C,
        sensors: &mut S,
        cal: &Calibration,
        first: Channel,
    ) -> Result<Measurement, SensorError> {
        let second = first.other();
        let start = clock.now_micros();

        // Both beams already dark: nothing to time
        if cal.is_triggered(sensors.read_gate(second)?) {
            return match self.wait_for_clear(clock, sensors, cal)? {
                Some(fault) => Ok(Measurement::Timeout(fault)),
                None => Ok(Measurement::Ambiguous { first }),
            };
        }

        loop {
            if cal.is_triggered(sensors.read_gate(second)?) {
                let elapsed_us = clock.now_micros().saturating_sub(start).max(1);
                if self.sensor.wait_for_clear {
                    if let Some(fault) = self.wait_for_clear(clock, sensors, cal)? {
                        return Ok(Measurement::Timeout(fault));
                    }
                }
                return Ok(Measurement::Speed {
                    speed_mps: speed_mps(cal.distance_mm, elapsed_us),
                    elapsed_us,
                    first,
                });
            }

            if clock.now_micros().saturating_sub(start) >= self.max_measure_time_us {
                break;
            }
        }

        // Window closed without the second gate firing
        if !cal.is_triggered(sensors.read_gate(first)?) {
            return Ok(Measurement::Ambiguous { first });
        }
        if cal.is_triggered(sensors.read_gate(second)?) {
            Ok(Measurement::Timeout(SensorFault::Both))
        } else {
            Ok(Measurement::Timeout(first.into()))
        }
    }

    /// Wait up to one measurement window for both gates to clear
    ///
    /// Returns the gate(s) still blocked when the window closed.
    fn wait_for_clear<C: Clock, S: SensorReader>(
        &self,
        clock: &mut C,
        sensors: &mut S,
        cal: &Calibration,
    ) -> Result<Option<SensorFault>, SensorError> {
        let start = clock.now_micros();

        loop {
            let left = cal.is_triggered(sensors.read_gate(Channel::Left)?);
            let right = cal.is_triggered(sensors.read_gate(Channel::Right)?);
            if !left && !right {
                return Ok(None);
            }
            if clock.now_micros().saturating_sub(start) >= self.max_measure_time_us {
                return Ok(SensorFault::from_blocked(left, right));
            }
        }
    }
}
