//! Dual-button gesture decoder
//!
//! Gestures are only started or finished when a channel's debounce settles.
//! Each gesture is consumed exactly once: as a short press on release, as a
//! both-released event, or as a hold once the hold time runs out.

use super::debounce::Debouncer;
use crate::channel::Channel;
use crate::config::TimingConfig;

/// Which buttons make up a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    Left,
    Right,
    Both,
}

impl From<Channel> for Gesture {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Left => Gesture::Left,
            Channel::Right => Gesture::Right,
        }
    }
}

/// Decoded button events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Single button pressed and released before the hold time
    ShortPress(Channel),
    /// Both buttons were pressed together and one has been released
    BothReleased,
    /// Gesture held longer than the hold time
    Hold(Gesture),
}

/// Button decoder state
#[derive(Debug, Clone)]
pub struct ButtonDecoder {
    debouncers: [Debouncer; 2],
    gesture: Option<Gesture>,
    hold_start_ms: u64,
    debounce_ms: u32,
    hold_ms: u32,
}

impl ButtonDecoder {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            debouncers: [Debouncer::new(); 2],
            gesture: None,
            hold_start_ms: 0,
            debounce_ms: timing.debounce_ms,
            hold_ms: timing.hold_ms,
        }
    }

    /// Currently active gesture
    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    /// Feed one sample of both raw levels (indexed by [`Channel::index`])
    ///
    /// Returns at most one event per call.
    pub fn poll(&mut self, now_ms: u64, pressed: [bool; 2]) -> Option<ButtonEvent> {
        let mut event = None;

        for channel in Channel::ALL {
            let i = channel.index();
            if let Some(level) = self.debouncers[i].update(pressed[i], now_ms, self.debounce_ms) {
                if let Some(settled) = self.on_settle(channel, level, pressed, now_ms) {
                    event.get_or_insert(settled);
                }
            }
        }

        event.or_else(|| self.check_hold(now_ms))
    }

    fn on_settle(
        &mut self,
        channel: Channel,
        level: bool,
        pressed: [bool; 2],
        now_ms: u64,
    ) -> Option<ButtonEvent> {
        if pressed[0] && pressed[1] {
            self.gesture = Some(Gesture::Both);
            self.hold_start_ms = now_ms;
            return None;
        }

        if self.gesture == Some(Gesture::Both) {
            self.gesture = None;
            return Some(ButtonEvent::BothReleased);
        }

        match (level, self.gesture) {
            (true, None) => {
                self.gesture = Some(channel.into());
                self.hold_start_ms = now_ms;
                None
            }
            (false, Some(g)) if g == Gesture::from(channel) => {
                self.gesture = None;
                Some(ButtonEvent::ShortPress(channel))
            }
            _ => None,
        }
    }

    fn check_hold(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let gesture = self.gesture?;
        if now_ms.saturating_sub(self.hold_start_ms) > self.hold_ms as u64 {
            self.gesture = None;
            return Some(ButtonEvent::Hold(gesture));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Drives a decoder one millisecond at a time
    struct Script {
        decoder: ButtonDecoder,
        now_ms: u64,
        events: Vec<ButtonEvent>,
    }

    impl Script {
        fn new() -> Self {
            Self {
                decoder: ButtonDecoder::new(&TimingConfig::default()),
                now_ms: 0,
                events: Vec::new(),
            }
        }

        fn hold_levels(&mut self, left: bool, right: bool, ms: u64) -> &mut Self {
            for _ in 0..ms {
                if let Some(event) = self.decoder.poll(self.now_ms, [left, right]) {
                    self.events.push(event);
                }
                self.now_ms += 1;
            }
            self
        }
    }

    #[test]
    fn test_short_press() {
        let mut s = Script::new();
        s.hold_levels(true, false, 100).hold_levels(false, false, 100);
        assert_eq!(s.events, vec![ButtonEvent::ShortPress(Channel::Left)]);
    }

    #[test]
    fn test_hold_suppresses_short_press() {
        let mut s = Script::new();
        s.hold_levels(false, true, 800).hold_levels(false, false, 100);
        assert_eq!(s.events, vec![ButtonEvent::Hold(Gesture::Right)]);
        assert_eq!(s.decoder.gesture(), None);
    }

    #[test]
    fn test_hold_fires_after_hold_time() {
        let mut s = Script::new();
        // Settles at 30 ms, hold fires once more than 500 ms have passed
        s.hold_levels(true, false, 531);
        assert!(s.events.is_empty());
        s.hold_levels(true, false, 1);
        assert_eq!(s.events, vec![ButtonEvent::Hold(Gesture::Left)]);
    }

    #[test]
    fn test_simultaneous_press_gives_one_both_released() {
        let mut s = Script::new();
        s.hold_levels(true, true, 100).hold_levels(false, false, 100);
        assert_eq!(s.events, vec![ButtonEvent::BothReleased]);
    }

    #[test]
    fn test_staggered_press_becomes_both() {
        let mut s = Script::new();
        s.hold_levels(true, false, 10)
            .hold_levels(true, true, 100)
            .hold_levels(false, true, 10)
            .hold_levels(false, false, 100);
        assert_eq!(s.events, vec![ButtonEvent::BothReleased]);
    }

    #[test]
    fn test_both_hold() {
        let mut s = Script::new();
        s.hold_levels(true, true, 700).hold_levels(false, false, 100);
        assert_eq!(s.events, vec![ButtonEvent::Hold(Gesture::Both)]);
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut s = Script::new();
        for _ in 0..4 {
            s.hold_levels(true, false, 5).hold_levels(false, false, 5);
        }
        s.hold_levels(false, false, 100);
        assert!(s.events.is_empty());
    }

    #[test]
    fn test_bouncy_press_gives_one_event() {
        let mut s = Script::new();
        for _ in 0..3 {
            s.hold_levels(true, false, 3).hold_levels(false, false, 3);
        }
        s.hold_levels(true, false, 100);
        for _ in 0..3 {
            s.hold_levels(false, false, 3).hold_levels(true, false, 3);
        }
        s.hold_levels(false, false, 100);
        assert_eq!(s.events, vec![ButtonEvent::ShortPress(Channel::Left)]);
    }

    proptest! {
        #[test]
        fn press_is_consumed_at_most_once(
            right in any::<bool>(),
            press_ms in 0u64..1500,
        ) {
            let mut s = Script::new();
            s.hold_levels(!right, right, press_ms).hold_levels(false, false, 200);

            prop_assert!(s.events.len() <= 1);
            if let Some(event) = s.events.first() {
                let channel = if right { Channel::Right } else { Channel::Left };
                prop_assert!(
                    *event == ButtonEvent::ShortPress(channel)
                        || *event == ButtonEvent::Hold(channel.into())
                );
            }
        }
    }
}
