//! Character display support for Lightgate
//!
//! This crate provides:
//! - `CharDisplay` trait for text-mode displays (HD44780 and friends)
//! - `Screen`, a 2x16 line buffer with change tracking
//! - `Renderer`, which turns the device context into a screen
//!
//! # Architecture
//!
//! Rendering is a pure function of the device context, the live sensor
//! readings and the current time. The firmware renders into a `Screen`
//! whenever a refresh is due and pushes it to the display only if a line
//! actually changed.

#![no_std]

pub mod backend;
pub mod render;
pub mod screen;

// Re-export key types
pub use backend::{CharDisplay, DisplayError};
pub use render::Renderer;
pub use screen::{Line, Screen, SCREEN_COLS, SCREEN_ROWS};
