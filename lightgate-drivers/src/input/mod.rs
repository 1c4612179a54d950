//! Input drivers

pub mod buttons;

pub use buttons::{ActiveLevel, GpioButtons};
