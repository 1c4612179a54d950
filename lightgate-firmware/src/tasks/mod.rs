//! Embassy async tasks
//!
//! A single control task owns the whole device; `main` only wires it up.

pub mod control;

pub use control::{control_task, Buttons, Control, Lcd, Sensors};
