//! Lightgate - Light-Gate Speed Meter Firmware
//!
//! Main firmware binary for RP2040 boards. Two light barriers a known
//! distance apart time a passing object; two buttons drive a menu on a
//! 16x2 character LCD.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use lightgate_core::ControlLoop;
use lightgate_drivers::input::{ActiveLevel, GpioButtons};
use lightgate_drivers::lcd::{Hd44780, PCF8574_ADDR};
use lightgate_drivers::sensor::ScaledAdc;

use crate::config::load_config;
use crate::hw::{EmbassyClock, RpAdc};

/// Embedded configuration (compiled into firmware)
/// Edit lightgate.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../lightgate.toml");

mod config;
mod hw;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lightgate firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config(EMBEDDED_CONFIG);
    info!(
        "Speed band {}..{} m/s, window {} us",
        config.speed.min_mps, config.speed.max_mps, config.timing.max_measure_time_us
    );

    // Buttons pull to 3V3 when pressed
    // Pin assignment is board-specific (GPIO14 left, GPIO15 right)
    let buttons = GpioButtons::new(
        Input::new(p.PIN_14, Pull::Down),
        Input::new(p.PIN_15, Pull::Down),
        ActiveLevel::High,
    );

    // Gates on ADC0/ADC1, distance pot on ADC2, threshold pot on ADC3
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let sensors = ScaledAdc::new(RpAdc::new(
        adc,
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
        Channel::new_pin(p.PIN_29, Pull::None),
    ));
    info!("ADC initialized");

    // LCD backpack on I2C0 (GPIO5 SCL, GPIO4 SDA)
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, I2cConfig::default());
    let mut lcd = Hd44780::new(i2c, Delay, PCF8574_ADDR);
    match lcd.init().await {
        Ok(()) => info!("LCD initialized"),
        Err(e) => warn!("LCD init failed: {}", e),
    }

    let control = ControlLoop::new(&config, EmbassyClock, sensors, buttons);
    spawner.spawn(tasks::control_task(control, lcd)).unwrap();

    info!("All tasks spawned");

    // Main loop - heartbeat
    loop {
        Timer::after_secs(60).await;
        trace!("Heartbeat");
    }
}
