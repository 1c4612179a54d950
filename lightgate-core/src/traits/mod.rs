//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod buttons;
pub mod clock;
pub mod sensor;

pub use buttons::ButtonInputs;
pub use clock::Clock;
pub use sensor::{AnalogInput, SensorError, SensorReader};
