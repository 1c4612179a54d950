//! Analog sensor drivers

pub mod adc;

pub use adc::{rescale, AdcReader, ScaledAdc};
