//! Speed measurement

pub mod engine;

pub use engine::{speed_mps, LiveReadings, Measurement, SpeedEngine};
