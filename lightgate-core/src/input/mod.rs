//! Button input decoding
//!
//! Raw button levels are debounced per channel and turned into at most one
//! gesture event per control cycle.

pub mod debounce;
pub mod decoder;

pub use debounce::Debouncer;
pub use decoder::{ButtonDecoder, ButtonEvent, Gesture};
