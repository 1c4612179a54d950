//! Screen rendering
//!
//! Builds the 16x2 layouts for each device state. Speeds are shown with two
//! decimals; history entries are numbered from 1.

use core::fmt::Write;

use lightgate_core::measure::LiveReadings;
use lightgate_core::state::{
    DeviceContext, DeviceState, HistoryMenuItem, Notice, SensorFault, SettingsPage, SETTINGS_PAGES,
};

use crate::screen::{Line, Screen};

/// Screen renderer for the device states
pub struct Renderer {
    screen: Screen,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Render the splash shown while the firmware starts
    pub fn render_boot(&mut self) {
        self.screen.set_line(0, "   LIGHTGATE");
        self.screen.set_line(1, "  speed meter");
    }

    /// Render the screen for the current device context
    pub fn render<const N: usize>(
        &mut self,
        ctx: &DeviceContext<N>,
        readings: &LiveReadings,
        now_ms: u64,
    ) {
        if let Some(notice) = ctx.notice(now_ms) {
            self.render_notice(notice);
            return;
        }

        match ctx.state() {
            DeviceState::Default => self.render_live(ctx, readings),
            DeviceState::Settings => {
                let page = SettingsPage::from_substate(ctx.substate());
                self.render_settings(page, ctx.substate(), readings);
            }
            DeviceState::History => self.render_history(ctx),
            DeviceState::HistoryMenu => {
                let item = HistoryMenuItem::from_substate(ctx.substate());
                self.render_history_menu(item, ctx.read_index());
            }
            DeviceState::Replace => self.render_replace(ctx.read_index()),
            DeviceState::ReplaceQuestion => self.render_replace_question(ctx.staged()),
            DeviceState::Remove => self.render_remove(ctx.read_index()),
            DeviceState::SensorError(fault) => self.render_sensor_error(fault),
        }
    }

    fn render_live<const N: usize>(&mut self, ctx: &DeviceContext<N>, readings: &LiveReadings) {
        let history = ctx.history();

        let mut top = Line::new();
        match history.latest() {
            Some(speed) => {
                let _ = write!(top, "Last {:.2} m/s", speed);
            }
            None => {
                let _ = top.push_str("Ready");
            }
        }
        self.screen.set_line(0, &top);

        let mut bottom = Line::new();
        let _ = write!(
            bottom,
            "{}/{} d={}mm",
            history.len(),
            history.capacity(),
            readings.distance_mm
        );
        self.screen.set_line(1, &bottom);
    }

    fn render_settings(&mut self, page: SettingsPage, substate: u8, readings: &LiveReadings) {
        let title = match page {
            SettingsPage::Distance => "Distance",
            SettingsPage::Threshold => "Threshold",
            SettingsPage::SensorLevels => "Sensors",
            SettingsPage::SendUsb => "Send via USB",
        };

        let mut top = Line::new();
        let _ = write!(top, "{:<13}{}/{}", title, substate + 1, SETTINGS_PAGES);
        self.screen.set_line(0, &top);

        let mut bottom = Line::new();
        let _ = match page {
            SettingsPage::Distance => write!(bottom, "{} mm", readings.distance_mm),
            SettingsPage::Threshold => write!(bottom, "{}", readings.threshold),
            SettingsPage::SensorLevels => {
                write!(bottom, "L{:<5} R{}", readings.left, readings.right)
            }
            SettingsPage::SendUsb => write!(bottom, "Not available"),
        };
        self.screen.set_line(1, &bottom);
    }

    fn render_history<const N: usize>(&mut self, ctx: &DeviceContext<N>) {
        let history = ctx.history();

        match ctx.read_index() {
            None => {
                self.screen.set_line(0, "All measurements");
                let mut bottom = Line::new();
                if history.is_empty() {
                    let _ = bottom.push_str("Empty");
                } else {
                    let sum: f32 = history.as_slice().iter().sum();
                    let _ = write!(bottom, "Avg {:.2} m/s", sum / history.len() as f32);
                }
                self.screen.set_line(1, &bottom);
            }
            Some(i) => {
                let mut top = Line::new();
                let _ = write!(top, "#{}/{}", i + 1, history.len());
                if history.write_index() == Some(i) {
                    let _ = top.push_str(" latest");
                }
                self.screen.set_line(0, &top);

                let mut bottom = Line::new();
                if let Some(speed) = history.get(i) {
                    let _ = write!(bottom, "{:.2} m/s", speed);
                }
                self.screen.set_line(1, &bottom);
            }
        }
    }

    fn render_history_menu(&mut self, item: HistoryMenuItem, read_index: Option<usize>) {
        self.screen.set_line(0, &entry_label(read_index));
        let label = match item {
            HistoryMenuItem::Replace => "> Replace",
            HistoryMenuItem::Remove => "> Remove",
            HistoryMenuItem::RemoveAll => "> Remove all",
        };
        self.screen.set_line(1, label);
    }

    fn render_replace(&mut self, read_index: Option<usize>) {
        let mut top = Line::new();
        let _ = top.push_str("Replace ");
        let _ = top.push_str(&entry_label(read_index));
        self.screen.set_line(0, &top);
        self.screen.set_line(1, "Measuring...");
    }

    fn render_replace_question(&mut self, staged: Option<f32>) {
        let mut top = Line::new();
        if let Some(speed) = staged {
            let _ = write!(top, "Keep {:.2} m/s?", speed);
        }
        self.screen.set_line(0, &top);
        self.screen.set_line(1, "L:No       R:Yes");
    }

    fn render_remove(&mut self, read_index: Option<usize>) {
        let mut top = Line::new();
        match read_index {
            Some(i) => {
                let _ = write!(top, "Remove #{}?", i + 1);
            }
            None => {
                let _ = top.push_str("Remove all?");
            }
        }
        self.screen.set_line(0, &top);
        self.screen.set_line(1, "L:Yes       R:No");
    }

    fn render_sensor_error(&mut self, fault: SensorFault) {
        self.screen.set_line(0, "Sensor blocked");
        let detail = match fault {
            SensorFault::Left => "Check left gate",
            SensorFault::Right => "Check right gate",
            SensorFault::Both => "Check both gates",
        };
        self.screen.set_line(1, detail);
    }

    fn render_notice(&mut self, notice: Notice) {
        match notice {
            Notice::UnclearReading => {
                self.screen.set_line(0, "Unclear reading");
                self.screen.set_line(1, "Try again");
            }
        }
    }
}

fn entry_label(read_index: Option<usize>) -> Line {
    let mut label = Line::new();
    match read_index {
        Some(i) => {
            let _ = write!(label, "#{}", i + 1);
        }
        None => {
            let _ = label.push_str("all");
        }
    }
    label
}
