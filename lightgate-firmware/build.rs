//! Build script for lightgate-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lightgate.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate lightgate.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=lightgate.toml");

    let config_path = Path::new("lightgate.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: lightgate.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds lightgate.toml at compile time.             ║\n\
            ║  Please create one in the lightgate-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read lightgate.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in lightgate.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_speed(&config, &mut errors);
    validate_sensor(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in lightgate.toml                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=lightgate.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only the sections the firmware parser understands are allowed
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };

    for (name, value) in table {
        if !["timing", "speed", "sensor"].contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("'{}' must be a [section]", name));
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::Table> {
    config.get(name).and_then(|v| v.as_table())
}

/// Check an integer key: known type, inside `min..=max`
fn check_int(
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn check_known_keys(table: &toml::Table, section: &str, known: &[&str], errors: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = section(config, "timing") else {
        return;
    };

    check_known_keys(
        timing,
        "timing",
        &[
            "refresh_ms",
            "debounce_ms",
            "hold_ms",
            "max_measure_time_us",
            "unclear_notice_ms",
        ],
        errors,
    );
    check_int(timing, "timing", "refresh_ms", 1, 10_000, errors);
    check_int(timing, "timing", "debounce_ms", 1, 1_000, errors);
    check_int(timing, "timing", "hold_ms", 1, 10_000, errors);
    check_int(timing, "timing", "max_measure_time_us", 1, 60_000_000, errors);
    check_int(timing, "timing", "unclear_notice_ms", 0, 60_000, errors);
}

fn validate_speed(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(speed) = section(config, "speed") else {
        return;
    };

    check_known_keys(speed, "speed", &["min_mps", "max_mps"], errors);

    let float = |key: &str| match speed.get(key) {
        Some(toml::Value::Float(v)) => Some(*v),
        Some(toml::Value::Integer(v)) => Some(*v as f64),
        _ => None,
    };
    for key in ["min_mps", "max_mps"] {
        if speed.contains_key(key) && float(key).is_none() {
            errors.push(format!("[speed] {} must be a number", key));
        }
    }

    let min = float("min_mps").unwrap_or(0.1);
    let max = float("max_mps").unwrap_or(50.0);
    if min < 0.0 || min >= max {
        errors.push("[speed] min_mps must be >= 0 and below max_mps".to_string());
    }
}

fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sensor) = section(config, "sensor") else {
        return;
    };

    check_known_keys(
        sensor,
        "sensor",
        &[
            "min_distance_mm",
            "max_distance_mm",
            "min_threshold",
            "max_threshold",
            "wait_for_clear",
        ],
        errors,
    );
    check_int(sensor, "sensor", "min_distance_mm", 0, 65_535, errors);
    check_int(sensor, "sensor", "max_distance_mm", 0, 65_535, errors);
    check_int(sensor, "sensor", "min_threshold", 0, 1023, errors);
    check_int(sensor, "sensor", "max_threshold", 0, 1023, errors);

    let int = |key: &str, default: i64| {
        sensor
            .get(key)
            .and_then(|v| v.as_integer())
            .unwrap_or(default)
    };
    if int("min_distance_mm", 100) >= int("max_distance_mm", 1000) {
        errors.push("[sensor] min_distance_mm must be below max_distance_mm".to_string());
    }
    if int("min_threshold", 0) > int("max_threshold", 1023) {
        errors.push("[sensor] min_threshold must not exceed max_threshold".to_string());
    }

    if let Some(v) = sensor.get("wait_for_clear") {
        if !v.is_bool() {
            errors.push("[sensor] wait_for_clear must be true or false".to_string());
        }
    }
}
