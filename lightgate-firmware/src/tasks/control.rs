//! Control task
//!
//! Runs one control cycle per millisecond and pushes the rendered screen
//! to the LCD whenever the throttled refresh comes due. A measurement in
//! progress blocks this task for up to `max_measure_time_us`.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker, Timer};

use lightgate_core::measure::Measurement;
use lightgate_core::{ControlLoop, CycleReport};
use lightgate_display::{CharDisplay, Renderer};
use lightgate_drivers::input::GpioButtons;
use lightgate_drivers::lcd::Hd44780;
use lightgate_drivers::sensor::ScaledAdc;

use crate::hw::{EmbassyClock, RpAdc};

/// Control cycle interval in milliseconds
pub const CYCLE_INTERVAL_MS: u64 = 1;

/// How long the boot splash stays up
const BOOT_SPLASH_MS: u64 = 1000;

pub type Buttons = GpioButtons<Input<'static>, Input<'static>>;
pub type Sensors = ScaledAdc<RpAdc>;
pub type Control = ControlLoop<EmbassyClock, Sensors, Buttons>;
pub type Lcd = Hd44780<I2c<'static, I2C0, Async>, Delay>;

#[embassy_executor::task]
pub async fn control_task(mut control: Control, mut lcd: Lcd) {
    info!("Control task started");

    let mut renderer = Renderer::new();
    renderer.render_boot();
    draw(&mut lcd, &mut renderer).await;
    Timer::after_millis(BOOT_SPLASH_MS).await;

    let mut ticker = Ticker::every(Duration::from_millis(CYCLE_INTERVAL_MS));

    loop {
        ticker.next().await;

        let report = match control.cycle() {
            Ok(report) => report,
            Err(e) => {
                error!("Sensor read failed: {}", e);
                continue;
            }
        };
        log_report(&report);

        if !report.refresh_due {
            continue;
        }

        let readings = match control.readings() {
            Ok(readings) => readings,
            Err(e) => {
                warn!("Live readings unavailable: {}", e);
                continue;
            }
        };
        let now_ms = control.now_millis();
        renderer.render(control.context(), &readings, now_ms);
        if renderer.screen().is_dirty() {
            draw(&mut lcd, &mut renderer).await;
        }
    }
}

/// Push the screen buffer to the LCD; a failed draw is retried next refresh
async fn draw(lcd: &mut Lcd, renderer: &mut Renderer) {
    if !lcd.is_initialized() {
        if let Err(e) = lcd.init().await {
            warn!("LCD init failed: {}", e);
            return;
        }
        info!("LCD initialized");
        renderer.screen_mut().mark_dirty();
    }
    if let Err(e) = lcd.draw(renderer.screen_mut()).await {
        warn!("LCD draw failed: {}", e);
    }
}

fn log_report(report: &CycleReport) {
    if let Some(event) = report.event {
        debug!("Button event: {}", event);
    }

    if report.state_changed() {
        info!("State: {} -> {}", report.previous_state, report.state);
        if let Some(fault) = report.state.sensor_fault() {
            error!("Sensor blocked: {}", fault);
        }
    }

    match report.measurement {
        Some(Measurement::Speed {
            speed_mps,
            elapsed_us,
            first,
        }) => {
            if report.accepted.is_some() {
                info!(
                    "Speed {} m/s ({} us, {} gate first)",
                    speed_mps, elapsed_us, first
                );
            } else {
                warn!("Speed {} m/s outside accepted band, dropped", speed_mps);
            }
        }
        Some(Measurement::Ambiguous { first }) => {
            warn!("Unclear reading ({} gate first)", first);
        }
        Some(Measurement::Timeout(fault)) if !report.state_changed() => {
            debug!("Sensor still blocked: {}", fault);
        }
        Some(Measurement::SensorsCleared) => {
            info!("Sensors clear again");
        }
        _ => {}
    }
}
