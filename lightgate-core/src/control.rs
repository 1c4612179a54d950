//! Control loop
//!
//! One cycle decodes the buttons, applies the resulting event, samples the
//! gates if the current state wants a measurement, and reports whether the
//! throttled display refresh is due. Nothing here blocks except the
//! measurement engine's bounded busy-wait.

use crate::channel::Channel;
use crate::config::{LightGateConfig, HISTORY_SIZE};
use crate::input::{ButtonDecoder, ButtonEvent};
use crate::measure::{LiveReadings, Measurement, SpeedEngine};
use crate::state::{DeviceContext, DeviceState};
use crate::traits::{ButtonInputs, Clock, SensorError, SensorReader};

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Decoded button event
    pub event: Option<ButtonEvent>,
    /// Measurement result, if the gates were sampled
    pub measurement: Option<Measurement>,
    /// Speed that was recorded or staged
    pub accepted: Option<f32>,
    /// State at the start of the cycle
    pub previous_state: DeviceState,
    /// State at the end of the cycle
    pub state: DeviceState,
    /// The display should be redrawn now
    pub refresh_due: bool,
}

impl CycleReport {
    pub fn state_changed(&self) -> bool {
        self.previous_state != self.state
    }
}

/// Owns the hardware handles and all device state
pub struct ControlLoop<C, S, B, const N: usize = HISTORY_SIZE> {
    clock: C,
    sensors: S,
    buttons: B,
    decoder: ButtonDecoder,
    engine: SpeedEngine,
    context: DeviceContext<N>,
    refresh_ms: u64,
    last_refresh_ms: Option<u64>,
}

impl<C, S, B, const N: usize> ControlLoop<C, S, B, N>
where
    C: Clock,
    S: SensorReader,
    B: ButtonInputs,
{
    pub fn new(config: &LightGateConfig, clock: C, sensors: S, buttons: B) -> Self {
        Self {
            clock,
            sensors,
            buttons,
            decoder: ButtonDecoder::new(&config.timing),
            engine: SpeedEngine::new(config),
            context: DeviceContext::new(config),
            refresh_ms: config.timing.refresh_ms as u64,
            last_refresh_ms: None,
        }
    }

    /// Run one control cycle
    pub fn cycle(&mut self) -> Result<CycleReport, SensorError> {
        let previous_state = self.context.state();

        let now_ms = self.clock.now_millis();
        let pressed = Channel::ALL.map(|channel| self.buttons.is_pressed(channel));
        let event = self.decoder.poll(now_ms, pressed);
        if let Some(event) = event {
            self.context.handle_button(event);
        }

        let mut measurement = None;
        let mut accepted = None;
        if self.context.state().wants_measurement() {
            let m = self
                .engine
                .measure(&mut self.clock, &mut self.sensors, self.context.state())?;
            let now_ms = self.clock.now_millis();
            accepted = self.context.handle_measurement(m, now_ms);
            measurement = Some(m);
        }

        let state = self.context.state();
        let now_ms = self.clock.now_millis();
        let refresh_due = state != previous_state || self.refresh_due(now_ms);
        if refresh_due {
            self.last_refresh_ms = Some(now_ms);
        }

        Ok(CycleReport {
            event,
            measurement,
            accepted,
            previous_state,
            state,
            refresh_due,
        })
    }

    fn refresh_due(&self, now_ms: u64) -> bool {
        match self.last_refresh_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.refresh_ms,
        }
    }

    pub fn context(&self) -> &DeviceContext<N> {
        &self.context
    }

    /// Sample the live values the settings screens show
    pub fn readings(&mut self) -> Result<LiveReadings, SensorError> {
        self.engine.readings(&mut self.sensors)
    }

    pub fn now_millis(&mut self) -> u64 {
        self.clock.now_millis()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }
}
