//! Push-button inputs

use crate::channel::Channel;

/// Raw (undebounced) button levels
pub trait ButtonInputs {
    /// Check whether the button on `channel` currently reads as pressed
    ///
    /// Implementations handle pin polarity; the decoder only sees
    /// "pressed" or "released".
    fn is_pressed(&mut self, channel: Channel) -> bool;
}
