//! RP2040 bindings for the core traits

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_time::Instant;
use lightgate_core::traits::{AnalogInput, Clock, SensorError};
use lightgate_core::Channel as Gate;
use lightgate_drivers::sensor::AdcReader;

/// Microsecond clock backed by the Embassy time driver
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_micros(&mut self) -> u64 {
        Instant::now().as_micros()
    }
}

/// The four analog inputs on the RP2040's 12-bit ADC
///
/// Reads are blocking so the measurement loop can busy-wait on them.
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    left_gate: Channel<'static>,
    right_gate: Channel<'static>,
    distance_pot: Channel<'static>,
    threshold_pot: Channel<'static>,
}

impl RpAdc {
    pub fn new(
        adc: Adc<'static, Blocking>,
        left_gate: Channel<'static>,
        right_gate: Channel<'static>,
        distance_pot: Channel<'static>,
        threshold_pot: Channel<'static>,
    ) -> Self {
        Self {
            adc,
            left_gate,
            right_gate,
            distance_pot,
            threshold_pot,
        }
    }
}

impl AdcReader for RpAdc {
    const RESOLUTION_BITS: u8 = 12;

    fn read_raw(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        let channel = match input {
            AnalogInput::Gate(Gate::Left) => &mut self.left_gate,
            AnalogInput::Gate(Gate::Right) => &mut self.right_gate,
            AnalogInput::DistancePot => &mut self.distance_pot,
            AnalogInput::ThresholdPot => &mut self.threshold_pot,
        };
        self.adc
            .blocking_read(channel)
            .map_err(|_| SensorError::ConversionError)
    }
}
