// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as hour/minute ranges, parseable timezones, and
//! chunking bounds.

use crate::diagnostic::ConfigError;
use crate::model::RitmoConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_FORCE_SEND: &[&str] = &["morning", "evening", "both"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RitmoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if config.agent.default_tz.parse::<chrono_tz::Tz>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.default_tz `{}` is not a valid IANA timezone",
                config.agent.default_tz
            ),
        });
    }

    if config.agent.baseline_points_per_day == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.baseline_points_per_day must be greater than zero".to_string(),
        });
    }

    for (key, hour) in [
        ("schedule.morning_hour", config.schedule.morning_hour),
        ("schedule.evening_hour", config.schedule.evening_hour),
    ] {
        if hour > 23 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be 0-23, got {hour}"),
            });
        }
    }

    for (key, minute) in [
        ("schedule.morning_minute", config.schedule.morning_minute),
        ("schedule.evening_minute", config.schedule.evening_minute),
    ] {
        if minute > 59 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be 0-59, got {minute}"),
            });
        }
    }

    if !(1..=120).contains(&config.schedule.window_minutes) {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.window_minutes must be 1-120, got {}",
                config.schedule.window_minutes
            ),
        });
    }

    if let Some(mode) = &config.schedule.force_send
        && !VALID_FORCE_SEND.contains(&mode.as_str())
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.force_send must be one of {}, got `{mode}`",
                VALID_FORCE_SEND.join(", ")
            ),
        });
    }

    if config.evaluator.timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "evaluator.timeout_ms must be greater than zero".to_string(),
        });
    }

    if !config.evaluator.base_url.starts_with("http") {
        errors.push(ConfigError::Validation {
            message: format!(
                "evaluator.base_url must be an http(s) URL, got `{}`",
                config.evaluator.base_url
            ),
        });
    }

    if !(128..=4096).contains(&config.telegram.chunk_size) {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.chunk_size must be 128-4096, got {}",
                config.telegram.chunk_size
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
