//! Minimal TOML parser for the device configuration
//!
//! Handles only the flat subset `lightgate.toml` uses. It does NOT support
//! the full TOML spec.
//!
//! Supported features:
//! - `[timing]`, `[speed]` and `[sensor]` section headers
//! - Key = value pairs (integer, float, boolean)
//! - Comments (# ...), also after a value
//!
//! Keys that are not present keep their default value.

use lightgate_core::config::LightGateConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Key is not known in its section
    UnknownKey,
    /// Key = value pair outside of any section
    MissingSection,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Speed,
    Sensor,
}

/// Parse TOML configuration on top of the defaults
pub fn parse_config(input: &str) -> Result<LightGateConfig, ParseError> {
    let mut config = LightGateConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

/// Parse a header line like `[timing]`, trailing comment allowed
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match name.trim() {
        "timing" => Ok(Section::Timing),
        "speed" => Ok(Section::Speed),
        "sensor" => Ok(Section::Sensor),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    config: &mut LightGateConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::MissingSection),
        Section::Timing => {
            let timing = &mut config.timing;
            match key {
                "refresh_ms" => timing.refresh_ms = parse_int(value)?,
                "debounce_ms" => timing.debounce_ms = parse_int(value)?,
                "hold_ms" => timing.hold_ms = parse_int(value)?,
                "max_measure_time_us" => timing.max_measure_time_us = parse_int(value)?,
                "unclear_notice_ms" => timing.unclear_notice_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Speed => match key {
            "min_mps" => config.speed.min_mps = parse_float(value)?,
            "max_mps" => config.speed.max_mps = parse_float(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Sensor => {
            let sensor = &mut config.sensor;
            match key {
                "min_distance_mm" => sensor.min_distance_mm = parse_int(value)?,
                "max_distance_mm" => sensor.max_distance_mm = parse_int(value)?,
                "min_threshold" => sensor.min_threshold = parse_int(value)?,
                "max_threshold" => sensor.max_threshold = parse_int(value)?,
                "wait_for_clear" => sensor.wait_for_clear = parse_bool(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }
    Ok(())
}

/// Drop a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(hash_pos) => line[..hash_pos].trim(),
        None => line,
    }
}

/// Split `key = value`, removing inline comments
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
