// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ritmo.toml` > `~/.config/ritmo/ritmo.toml` >
//! `/etc/ritmo/ritmo.toml` with environment variable overrides via the
//! `RITMO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RitmoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ritmo/ritmo.toml` (system-wide)
/// 3. `~/.config/ritmo/ritmo.toml` (user XDG config)
/// 4. `./ritmo.toml` (local directory)
/// 5. `RITMO_*` environment variables
pub fn load_config() -> Result<RitmoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup).
///
/// Used for testing and for callers that supply their own config text.
pub fn load_config_from_str(toml_content: &str) -> Result<RitmoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RitmoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RitmoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RitmoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RitmoConfig::default()))
        .merge(Toml::file("/etc/ritmo/ritmo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ritmo/ritmo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ritmo.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `RITMO_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("RITMO_").map(|key| {
        // Figment invokes `map` before its own lowercasing pass, so `key`
        // arrives in the env var's original (upper) case; normalize it here,
        // e.g. RITMO_TELEGRAM_BOT_TOKEN -> "telegram_bot_token".
        let key_str = key.as_str().to_ascii_lowercase();
        let key_str = key_str.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("schedule_", "schedule.", 1)
            .replacen("evaluator_", "evaluator.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [schedule]
            morning_hour = 9
            window_minutes = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.schedule.morning_hour, 9);
        assert_eq!(config.schedule.window_minutes, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.schedule.evening_hour, 18);
        assert_eq!(config.agent.name, "ritmo");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [agent]
            naem = "typo"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn env_var_maps_to_nested_key() {
        unsafe {
            std::env::set_var("RITMO_TELEGRAM_BOT_TOKEN", "123:abc");
        }
        let config = load_config().unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        unsafe {
            std::env::remove_var("RITMO_TELEGRAM_BOT_TOKEN");
        }
    }

    #[test]
    #[serial]
    fn env_var_force_send_reaches_schedule_section() {
        unsafe {
            std::env::set_var("RITMO_SCHEDULE_FORCE_SEND", "morning");
        }
        let config = load_config().unwrap();
        assert_eq!(config.schedule.force_send.as_deref(), Some("morning"));
        unsafe {
            std::env::remove_var("RITMO_SCHEDULE_FORCE_SEND");
        }
    }
}
