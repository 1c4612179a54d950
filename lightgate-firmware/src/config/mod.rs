//! Configuration loading
//!
//! The configuration is compiled into the firmware from `lightgate.toml`
//! and parsed at boot by a small no_std parser. Anything unusable falls
//! back to the built-in defaults.

pub mod toml;

use defmt::*;
use lightgate_core::config::LightGateConfig;

pub use toml::{parse_config, ParseError};

/// Parse and validate the embedded configuration
pub fn load_config(input: &str) -> LightGateConfig {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            warn!("Config parse failed: {}, using defaults", e);
            return LightGateConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Configuration loaded from lightgate.toml");
            config
        }
        Err(e) => {
            warn!("Config rejected: {}, using defaults", e);
            LightGateConfig::default()
        }
    }
}
