//! Analog sensor inputs

use crate::channel::Channel;

/// Errors that can occur while sampling an analog input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    ConversionError,
    /// Input is not wired on this board
    Unavailable,
}

/// Analog inputs the device samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogInput {
    /// Light-gate photo sensor; lower reading means less light
    Gate(Channel),
    /// Gate separation potentiometer
    DistancePot,
    /// Trigger threshold potentiometer
    ThresholdPot,
}

/// Trait for reading the analog inputs
///
/// Readings use a 10-bit scale (0..=1023) regardless of the ADC actually
/// fitted; implementations rescale as needed.
///
/// Takes `&mut self` because ADC reads typically require mutable access.
pub trait SensorReader {
    /// Sample one input
    fn read(&mut self, input: AnalogInput) -> Result<u16, SensorError>;

    /// Sample a light gate
    fn read_gate(&mut self, channel: Channel) -> Result<u16, SensorError> {
        self.read(AnalogInput::Gate(channel))
    }
}
