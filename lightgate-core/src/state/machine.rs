//! Device states
//!
//! Which screen is shown, whether the gates are sampled and how each button
//! gesture is interpreted are all functions of the current state.

use crate::channel::Channel;

/// Number of pages in the settings menu
pub const SETTINGS_PAGES: u8 = 4;

/// Number of entries in the history menu
pub const HISTORY_MENU_ITEMS: u8 = 3;

/// Device states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Live measurement screen
    Default,
    /// Settings pages, selected by substate
    Settings,
    /// Browsing recorded measurements
    History,
    /// Actions on the selected history entry, selected by substate
    HistoryMenu,
    /// Measuring a replacement for the selected entry
    Replace,
    /// Asking whether to keep the replacement measurement
    ReplaceQuestion,
    /// Asking to confirm a removal
    Remove,
    /// A gate stayed blocked past the measurement window
    SensorError(SensorFault),
}

/// Which gate(s) stayed blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    Left,
    Right,
    Both,
}

impl From<Channel> for SensorFault {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Left => SensorFault::Left,
            Channel::Right => SensorFault::Right,
        }
    }
}

impl SensorFault {
    /// Fault for the given blocked gates, `None` if both are clear
    pub fn from_blocked(left: bool, right: bool) -> Option<Self> {
        match (left, right) {
            (true, true) => Some(SensorFault::Both),
            (true, false) => Some(SensorFault::Left),
            (false, true) => Some(SensorFault::Right),
            (false, false) => None,
        }
    }
}

impl DeviceState {
    /// Check if the gates should be sampled in this state
    pub fn wants_measurement(&self) -> bool {
        matches!(
            self,
            DeviceState::Default | DeviceState::Replace | DeviceState::SensorError(_)
        )
    }

    /// Check if this is a sensor error state
    pub fn is_sensor_error(&self) -> bool {
        matches!(self, DeviceState::SensorError(_))
    }

    /// The blocked gate(s), if in a sensor error state
    pub fn sensor_fault(&self) -> Option<SensorFault> {
        match self {
            DeviceState::SensorError(fault) => Some(*fault),
            _ => None,
        }
    }

    /// Check if the substate selects something in this state
    pub fn has_substate(&self) -> bool {
        matches!(self, DeviceState::Settings | DeviceState::HistoryMenu)
    }

    /// Highest valid substate
    pub fn max_substate(&self) -> u8 {
        match self {
            DeviceState::Settings => SETTINGS_PAGES - 1,
            DeviceState::HistoryMenu => HISTORY_MENU_ITEMS - 1,
            _ => 0,
        }
    }
}

/// Settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsPage {
    /// Calibrated gate separation
    Distance,
    /// Calibrated trigger threshold
    Threshold,
    /// Raw readings of both gates
    SensorLevels,
    /// Placeholder; never acts
    SendUsb,
}

impl SettingsPage {
    pub fn from_substate(substate: u8) -> Self {
        match substate {
            0 => SettingsPage::Distance,
            1 => SettingsPage::Threshold,
            2 => SettingsPage::SensorLevels,
            _ => SettingsPage::SendUsb,
        }
    }
}

/// History menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HistoryMenuItem {
    Replace,
    Remove,
    RemoveAll,
}

impl HistoryMenuItem {
    pub fn from_substate(substate: u8) -> Self {
        match substate {
            0 => HistoryMenuItem::Replace,
            1 => HistoryMenuItem::Remove,
            _ => HistoryMenuItem::RemoveAll,
        }
    }
}
