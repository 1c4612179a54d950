//! Device context
//!
//! Everything the menu and the measurement integration mutate lives in one
//! owned struct. The control loop holds it and passes it events; the
//! renderer only reads it.

use super::machine::{DeviceState, HistoryMenuItem, SettingsPage};
use crate::channel::Channel;
use crate::config::{LightGateConfig, SpeedBand, HISTORY_SIZE};
use crate::history::HistoryBuffer;
use crate::input::{ButtonEvent, Gesture};
use crate::measure::Measurement;

/// Transient message shown on top of the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// One gate fired and cleared without the other firing
    UnclearReading,
}

/// Mutable device state
#[derive(Debug, Clone)]
pub struct DeviceContext<const N: usize = HISTORY_SIZE> {
    state: DeviceState,
    substate: u8,
    /// Selected history entry; `None` selects all measurements
    read_index: Option<usize>,
    history: HistoryBuffer<N>,
    /// Replacement speed awaiting confirmation
    staged: Option<f32>,
    notice_until_ms: Option<u64>,
    band: SpeedBand,
    unclear_notice_ms: u32,
}

impl<const N: usize> DeviceContext<N> {
    pub fn new(config: &LightGateConfig) -> Self {
        Self {
            state: DeviceState::Default,
            substate: 0,
            read_index: None,
            history: HistoryBuffer::new(),
            staged: None,
            notice_until_ms: None,
            band: config.speed,
            unclear_notice_ms: config.timing.unclear_notice_ms,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn substate(&self) -> u8 {
        self.substate
    }

    pub fn read_index(&self) -> Option<usize> {
        self.read_index
    }

    pub fn history(&self) -> &HistoryBuffer<N> {
        &self.history
    }

    pub fn staged(&self) -> Option<f32> {
        self.staged
    }

    /// Active settings page, if in the settings menu
    pub fn settings_page(&self) -> Option<SettingsPage> {
        (self.state == DeviceState::Settings).then(|| SettingsPage::from_substate(self.substate))
    }

    /// Highlighted history menu entry, if in the history menu
    pub fn history_menu_item(&self) -> Option<HistoryMenuItem> {
        (self.state == DeviceState::HistoryMenu)
            .then(|| HistoryMenuItem::from_substate(self.substate))
    }

    /// Notice to show at `now_ms`, if any
    pub fn notice(&self, now_ms: u64) -> Option<Notice> {
        match self.notice_until_ms {
            Some(until) if now_ms < until => Some(Notice::UnclearReading),
            _ => None,
        }
    }

    fn enter(&mut self, state: DeviceState) {
        self.state = state;
        self.substate = 0;
    }

    /// Apply a decoded button event
    pub fn handle_button(&mut self, event: ButtonEvent) {
        use ButtonEvent::*;
        use DeviceState::*;

        match (self.state, event) {
            (Default, ShortPress(Channel::Left)) => {
                self.read_index = None;
                self.enter(History);
            }
            (Default, ShortPress(Channel::Right)) => self.enter(Settings),
            (Default, BothReleased) => {
                self.notice_until_ms = None;
                self.enter(Default);
            }

            (state, ShortPress(Channel::Left)) if state.has_substate() => {
                self.substate = self.substate.saturating_sub(1);
            }
            (state, ShortPress(Channel::Right)) if state.has_substate() => {
                self.substate = (self.substate + 1).min(self.state.max_substate());
            }
            (Settings, BothReleased) => self.enter(Default),

            (History, ShortPress(Channel::Left)) => self.read_index = self.previous_index(),
            (History, ShortPress(Channel::Right)) => self.read_index = self.next_index(),
            (History, BothReleased) => self.enter(Default),
            (History, Hold(Gesture::Right)) => self.enter(HistoryMenu),
            (History, Hold(Gesture::Both)) if self.read_index.is_some() => self.enter(HistoryMenu),

            (HistoryMenu, BothReleased) => self.enter(History),
            (HistoryMenu, Hold(Gesture::Right)) => self.history_menu_action(),

            (Replace, BothReleased) => self.enter(History),

            (Remove, ShortPress(Channel::Left)) => {
                self.remove_selected();
                self.enter(History);
            }
            (Remove, ShortPress(Channel::Right)) => self.enter(History),

            (ReplaceQuestion, ShortPress(Channel::Left)) => {
                self.staged = None;
                self.enter(History);
            }
            (ReplaceQuestion, ShortPress(Channel::Right)) => {
                self.accept_replacement();
                self.enter(History);
            }

            _ => {}
        }
    }

    /// Apply a measurement result
    ///
    /// Returns the speed if it was recorded or staged. Speeds outside the
    /// band are dropped.
    pub fn handle_measurement(&mut self, measurement: Measurement, now_ms: u64) -> Option<f32> {
        match measurement {
            Measurement::Speed { speed_mps, .. } if self.band.contains(speed_mps) => {
                match self.state {
                    DeviceState::Default | DeviceState::SensorError(_) => {
                        self.history.push(speed_mps);
                        self.enter(DeviceState::Default);
                        Some(speed_mps)
                    }
                    DeviceState::Replace => {
                        self.staged = Some(speed_mps);
                        self.enter(DeviceState::ReplaceQuestion);
                        Some(speed_mps)
                    }
                    _ => None,
                }
            }
            Measurement::Speed { .. } | Measurement::NoTrigger => None,
            Measurement::Timeout(fault) => {
                self.enter(DeviceState::SensorError(fault));
                None
            }
            Measurement::Ambiguous { .. } => {
                self.notice_until_ms = Some(now_ms + self.unclear_notice_ms as u64);
                None
            }
            Measurement::SensorsCleared => {
                if self.state.is_sensor_error() {
                    self.enter(DeviceState::Default);
                }
                None
            }
        }
    }

    fn previous_index(&self) -> Option<usize> {
        match self.read_index {
            None => self.history.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        }
    }

    fn next_index(&self) -> Option<usize> {
        match self.read_index {
            None if !self.history.is_empty() => Some(0),
            Some(i) if i + 1 < self.history.len() => Some(i + 1),
            _ => None,
        }
    }

    fn history_menu_action(&mut self) {
        match HistoryMenuItem::from_substate(self.substate) {
            HistoryMenuItem::Replace => {
                if self.read_index.is_some() {
                    self.enter(DeviceState::Replace);
                }
            }
            HistoryMenuItem::Remove => self.enter(DeviceState::Remove),
            HistoryMenuItem::RemoveAll => {
                self.read_index = None;
                self.enter(DeviceState::Remove);
            }
        }
    }

    fn remove_selected(&mut self) {
        match self.read_index {
            None => self.history.clear(),
            Some(i) => {
                self.history.remove(i);
                if i >= self.history.len() {
                    self.read_index = self.history.len().checked_sub(1);
                }
            }
        }
    }

    fn accept_replacement(&mut self) {
        if let (Some(speed), Some(i)) = (self.staged.take(), self.read_index) {
            self.history.set(i, speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SensorFault;

    type Ctx = DeviceContext<8>;

    const LEFT: ButtonEvent = ButtonEvent::ShortPress(Channel::Left);
    const RIGHT: ButtonEvent = ButtonEvent::ShortPress(Channel::Right);
    const HOLD_RIGHT: ButtonEvent = ButtonEvent::Hold(Gesture::Right);
    const HOLD_BOTH: ButtonEvent = ButtonEvent::Hold(Gesture::Both);

    fn speed(speed_mps: f32) -> Measurement {
        Measurement::Speed {
            speed_mps,
            elapsed_us: 1000,
            first: Channel::Left,
        }
    }

    fn with_history(values: &[f32]) -> Ctx {
        let mut ctx = Ctx::new(&LightGateConfig::default());
        for &v in values {
            assert_eq!(ctx.handle_measurement(speed(v), 0), Some(v));
        }
        ctx
    }

    fn send(ctx: &mut Ctx, events: &[ButtonEvent]) {
        for &e in events {
            ctx.handle_button(e);
        }
    }

    #[test]
    fn test_default_menu_entries() {
        let mut ctx = with_history(&[]);
        ctx.handle_button(RIGHT);
        assert_eq!(ctx.state(), DeviceState::Settings);
        ctx.handle_button(ButtonEvent::BothReleased);
        assert_eq!(ctx.state(), DeviceState::Default);
        ctx.handle_button(LEFT);
        assert_eq!(ctx.state(), DeviceState::History);
        assert_eq!(ctx.read_index(), None);
    }

    #[test]
    fn test_settings_substate_is_clamped() {
        let mut ctx = with_history(&[]);
        send(&mut ctx, &[RIGHT, LEFT]);
        assert_eq!(ctx.substate(), 0);
        send(&mut ctx, &[RIGHT, RIGHT, RIGHT, RIGHT, RIGHT]);
        assert_eq!(ctx.substate(), 3);
        assert_eq!(ctx.settings_page(), Some(SettingsPage::SendUsb));
    }

    #[test]
    fn test_history_navigation_wraps() {
        let mut ctx = with_history(&[1.0, 2.0, 3.0]);
        ctx.handle_button(LEFT);

        ctx.handle_button(LEFT);
        assert_eq!(ctx.read_index(), Some(2));
        ctx.handle_button(RIGHT);
        assert_eq!(ctx.read_index(), None);
        ctx.handle_button(RIGHT);
        assert_eq!(ctx.read_index(), Some(0));
        ctx.handle_button(LEFT);
        assert_eq!(ctx.read_index(), None);
    }

    #[test]
    fn test_history_navigation_on_empty_history() {
        let mut ctx = with_history(&[]);
        send(&mut ctx, &[LEFT, LEFT]);
        assert_eq!(ctx.read_index(), None);
        ctx.handle_button(RIGHT);
        assert_eq!(ctx.read_index(), None);
    }

    #[test]
    fn test_both_hold_needs_selection() {
        let mut ctx = with_history(&[1.0]);
        send(&mut ctx, &[LEFT, HOLD_BOTH]);
        assert_eq!(ctx.state(), DeviceState::History);

        send(&mut ctx, &[RIGHT, HOLD_BOTH]);
        assert_eq!(ctx.state(), DeviceState::HistoryMenu);
        assert_eq!(ctx.history_menu_item(), Some(HistoryMenuItem::Replace));
    }

    #[test]
    fn test_history_menu_back_and_clamp() {
        let mut ctx = with_history(&[1.0]);
        send(&mut ctx, &[LEFT, HOLD_RIGHT, RIGHT, RIGHT, RIGHT]);
        assert_eq!(ctx.substate(), 2);
        ctx.handle_button(ButtonEvent::BothReleased);
        assert_eq!(ctx.state(), DeviceState::History);
        ctx.handle_button(HOLD_RIGHT);
        assert_eq!(ctx.substate(), 0);
    }

    #[test]
    fn test_remove_last_entry_moves_cursor_back() {
        let mut ctx = with_history(&[1.0, 2.0, 3.0]);
        // Select entry 2, open menu, pick "Remove", confirm
        send(&mut ctx, &[LEFT, LEFT, HOLD_RIGHT, RIGHT, HOLD_RIGHT]);
        assert_eq!(ctx.state(), DeviceState::Remove);
        ctx.handle_button(LEFT);

        assert_eq!(ctx.state(), DeviceState::History);
        assert_eq!(ctx.history().as_slice(), &[1.0, 2.0]);
        assert_eq!(ctx.read_index(), Some(1));
    }

    #[test]
    fn test_remove_only_entry_resets_cursor() {
        let mut ctx = with_history(&[1.0]);
        send(&mut ctx, &[LEFT, LEFT, HOLD_RIGHT, RIGHT, HOLD_RIGHT, LEFT]);
        assert!(ctx.history().is_empty());
        assert_eq!(ctx.read_index(), None);
    }

    #[test]
    fn test_remove_cancel_keeps_entry() {
        let mut ctx = with_history(&[1.0]);
        send(&mut ctx, &[LEFT, LEFT, HOLD_RIGHT, RIGHT, HOLD_RIGHT, RIGHT]);
        assert_eq!(ctx.state(), DeviceState::History);
        assert_eq!(ctx.history().len(), 1);
    }

    #[test]
    fn test_remove_all() {
        let mut ctx = with_history(&[1.0, 2.0, 3.0]);
        send(&mut ctx, &[LEFT, LEFT, HOLD_RIGHT, RIGHT, RIGHT, HOLD_RIGHT]);
        assert_eq!(ctx.state(), DeviceState::Remove);
        assert_eq!(ctx.read_index(), None);
        ctx.handle_button(LEFT);
        assert!(ctx.history().is_empty());
        assert_eq!(ctx.history().write_index(), None);
    }

    #[test]
    fn test_replace_requires_selection() {
        let mut ctx = with_history(&[1.0]);
        send(&mut ctx, &[LEFT, HOLD_RIGHT, HOLD_RIGHT]);
        assert_eq!(ctx.state(), DeviceState::HistoryMenu);
    }

    #[test]
    fn test_replace_accept() {
        let mut ctx = with_history(&[1.0, 2.0]);
        send(&mut ctx, &[LEFT, RIGHT, HOLD_RIGHT, HOLD_RIGHT]);
        assert_eq!(ctx.state(), DeviceState::Replace);
        assert!(ctx.state().wants_measurement());

        assert_eq!(ctx.handle_measurement(speed(7.5), 0), Some(7.5));
        assert_eq!(ctx.state(), DeviceState::ReplaceQuestion);
        assert_eq!(ctx.staged(), Some(7.5));
        // Nothing is written before the answer
        assert_eq!(ctx.history().as_slice(), &[1.0, 2.0]);

        ctx.handle_button(RIGHT);
        assert_eq!(ctx.state(), DeviceState::History);
        assert_eq!(ctx.history().as_slice(), &[7.5, 2.0]);
        assert_eq!(ctx.staged(), None);
    }

    #[test]
    fn test_replace_reject() {
        let mut ctx = with_history(&[1.0, 2.0]);
        send(&mut ctx, &[LEFT, RIGHT, HOLD_RIGHT, HOLD_RIGHT]);
        ctx.handle_measurement(speed(7.5), 0);
        ctx.handle_button(LEFT);
        assert_eq!(ctx.history().as_slice(), &[1.0, 2.0]);
        assert_eq!(ctx.staged(), None);
    }

    #[test]
    fn test_replace_cancel() {
        let mut ctx = with_history(&[1.0]);
        send(&mut ctx, &[LEFT, RIGHT, HOLD_RIGHT, HOLD_RIGHT]);
        ctx.handle_button(ButtonEvent::BothReleased);
        assert_eq!(ctx.state(), DeviceState::History);
    }

    #[test]
    fn test_out_of_band_speed_dropped() {
        let mut ctx = with_history(&[]);
        assert_eq!(ctx.handle_measurement(speed(0.1), 0), None);
        assert_eq!(ctx.handle_measurement(speed(50.0), 0), None);
        assert_eq!(ctx.handle_measurement(speed(80.0), 0), None);
        assert!(ctx.history().is_empty());
        assert_eq!(ctx.state(), DeviceState::Default);
    }

    #[test]
    fn test_sensor_error_lifecycle() {
        let mut ctx = with_history(&[]);
        ctx.handle_measurement(Measurement::Timeout(SensorFault::Left), 0);
        assert_eq!(ctx.state(), DeviceState::SensorError(SensorFault::Left));

        // Buttons do nothing while a gate is blocked
        send(&mut ctx, &[LEFT, RIGHT, ButtonEvent::BothReleased, HOLD_RIGHT]);
        assert_eq!(ctx.state(), DeviceState::SensorError(SensorFault::Left));

        ctx.handle_measurement(Measurement::SensorsCleared, 0);
        assert_eq!(ctx.state(), DeviceState::Default);
    }

    #[test]
    fn test_speed_in_error_state_recovers() {
        let mut ctx = with_history(&[]);
        ctx.handle_measurement(Measurement::Timeout(SensorFault::Both), 0);
        assert_eq!(ctx.handle_measurement(speed(2.0), 0), Some(2.0));
        assert_eq!(ctx.state(), DeviceState::Default);
        assert_eq!(ctx.history().latest(), Some(2.0));
    }

    #[test]
    fn test_unclear_notice_expires() {
        let mut ctx = with_history(&[]);
        ctx.handle_measurement(
            Measurement::Ambiguous {
                first: Channel::Right,
            },
            1000,
        );
        assert_eq!(ctx.state(), DeviceState::Default);
        assert_eq!(ctx.notice(1000), Some(Notice::UnclearReading));
        assert_eq!(ctx.notice(2999), Some(Notice::UnclearReading));
        assert_eq!(ctx.notice(3000), None);
    }

    #[test]
    fn test_both_released_clears_notice() {
        let mut ctx = with_history(&[]);
        ctx.handle_measurement(
            Measurement::Ambiguous {
                first: Channel::Left,
            },
            0,
        );
        ctx.handle_button(ButtonEvent::BothReleased);
        assert_eq!(ctx.notice(1), None);
    }
}
