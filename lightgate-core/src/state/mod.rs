//! Device state machine
//!
//! `DeviceState` names the active screen; `DeviceContext` owns it together
//! with the menu cursors and the measurement history, and applies button
//! events and measurement results to them.

pub mod context;
pub mod machine;

pub use context::{DeviceContext, Notice};
pub use machine::{
    DeviceState, HistoryMenuItem, SensorFault, SettingsPage, HISTORY_MENU_ITEMS, SETTINGS_PAGES,
};
