//! Board-agnostic core logic for the light-gate speed meter
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (clock, analog sensors, buttons)
//! - Speed measurement engine (two-gate transit timing)
//! - Debounced dual-button gesture decoder
//! - Measurement history ring
//! - Device state machine driving the two-button menu
//! - Control loop tying one cycle together
//! - Configuration and calibration types

// Host tests pull in std (proptest needs it); the firmware build stays no_std.
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod control;
pub mod history;
pub mod input;
pub mod measure;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::Channel;
pub use control::{ControlLoop, CycleReport};
