//! Push buttons on GPIO inputs

use embedded_hal::digital::InputPin;
use lightgate_core::traits::ButtonInputs;
use lightgate_core::Channel;

/// Pin level that means "pressed"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Button pulls the pin high (external or internal pull-down)
    High,
    /// Button pulls the pin low (pull-up)
    Low,
}

/// Left and right buttons on two input pins
///
/// A pin read error counts as "released".
pub struct GpioButtons<L, R> {
    left: L,
    right: R,
    active: ActiveLevel,
}

impl<L, R> GpioButtons<L, R>
where
    L: InputPin,
    R: InputPin,
{
    pub fn new(left: L, right: R, active: ActiveLevel) -> Self {
        Self {
            left,
            right,
            active,
        }
    }

    fn level(pin: &mut impl InputPin, active: ActiveLevel) -> bool {
        match active {
            ActiveLevel::High => pin.is_high().unwrap_or(false),
            ActiveLevel::Low => pin.is_low().unwrap_or(false),
        }
    }
}

impl<L, R> ButtonInputs for GpioButtons<L, R>
where
    L: InputPin,
    R: InputPin,
{
    fn is_pressed(&mut self, channel: Channel) -> bool {
        match channel {
            Channel::Left => Self::level(&mut self.left, self.active),
            Channel::Right => Self::level(&mut self.right, self.active),
        }
    }
}
