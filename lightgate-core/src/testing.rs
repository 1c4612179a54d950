//! Simulated hardware for host tests
//!
//! The clock advances a fixed step on every read; gates read "dark" inside
//! scripted intervals of that clock and "light" everywhere else.

use std::cell::Cell;
use std::rc::Rc;

use crate::channel::Channel;
use crate::traits::{AnalogInput, ButtonInputs, Clock, SensorError, SensorReader};

/// Gate reading while the beam is interrupted
pub const DARK: u16 = 100;
/// Gate reading while the beam is clear
pub const LIGHT: u16 = 900;

/// Clock that advances `step_us` every time it is read
pub struct SimClock {
    now: Rc<Cell<u64>>,
    step_us: u64,
}

impl SimClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            step_us,
        }
    }

    /// Shared view of the current time for simulated sensors
    pub fn handle(&self) -> Rc<Cell<u64>> {
        self.now.clone()
    }

    /// Current time without advancing
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Jump forward without counting as a read
    pub fn advance_ms(&mut self, ms: u64) {
        self.now.set(self.now.get() + ms * 1000);
    }
}

impl Clock for SimClock {
    fn now_micros(&mut self) -> u64 {
        let now = self.now.get() + self.step_us;
        self.now.set(now);
        now
    }
}

/// Gates and potentiometers driven by the simulated clock
pub struct SimSensors {
    now: Rc<Cell<u64>>,
    blocked: Vec<(Channel, u64, u64)>,
    distance_raw: u16,
    threshold_raw: u16,
    failing: bool,
}

impl SimSensors {
    pub fn new(now: Rc<Cell<u64>>) -> Self {
        Self {
            now,
            blocked: Vec::new(),
            distance_raw: 0,
            threshold_raw: 512,
            failing: false,
        }
    }

    /// Interrupt a beam during `[from_us, until_us)`
    pub fn block(&mut self, channel: Channel, from_us: u64, until_us: u64) {
        self.blocked.push((channel, from_us, until_us));
    }

    /// Remove every scripted interruption
    pub fn clear(&mut self) {
        self.blocked.clear();
    }

    pub fn set_pots(&mut self, distance_raw: u16, threshold_raw: u16) {
        self.distance_raw = distance_raw;
        self.threshold_raw = threshold_raw;
    }

    /// Make every subsequent read fail
    pub fn fail_reads(&mut self) {
        self.failing = true;
    }

    fn is_blocked(&self, channel: Channel) -> bool {
        let now = self.now.get();
        self.blocked
            .iter()
            .any(|&(c, from, until)| c == channel && now >= from && now < until)
    }
}

impl SensorReader for SimSensors {
    fn read(&mut self, input: AnalogInput) -> Result<u16, SensorError> {
        if self.failing {
            return Err(SensorError::ConversionError);
        }
        Ok(match input {
            AnalogInput::Gate(channel) if self.is_blocked(channel) => DARK,
            AnalogInput::Gate(_) => LIGHT,
            AnalogInput::DistancePot => self.distance_raw,
            AnalogInput::ThresholdPot => self.threshold_raw,
        })
    }
}

/// Buttons set directly by the test
#[derive(Default)]
pub struct SimButtons {
    pressed: [bool; 2],
}

impl SimButtons {
    pub fn set(&mut self, channel: Channel, pressed: bool) {
        self.pressed[channel.index()] = pressed;
    }
}

impl ButtonInputs for SimButtons {
    fn is_pressed(&mut self, channel: Channel) -> bool {
        self.pressed[channel.index()]
    }
}
