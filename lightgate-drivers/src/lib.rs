//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lightgate-core and lightgate-display:
//!
//! - Character LCD (HD44780 behind a PCF8574 I2C expander)
//! - Push buttons on embedded-hal input pins
//! - ADC rescaling onto the 10-bit reading scale

#![no_std]
#![deny(unsafe_code)]

pub mod input;
pub mod lcd;
pub mod sensor;
