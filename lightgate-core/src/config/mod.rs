//! Configuration types
//!
//! Board-agnostic timing, speed-band and sensor calibration settings.
//! Defaults reproduce the reference device; the firmware may override
//! them from its embedded TOML file.

pub mod calibration;
pub mod types;

pub use calibration::{map_range, Calibration};
pub use types::*;
