// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ritmo daily-cycle engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ritmo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RitmoConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Daily prompt window settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Remote evaluator / reason-classifier settings.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Telegram delivery settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// IANA timezone used when a user has no timezone on record.
    #[serde(default = "default_tz")]
    pub default_tz: String,

    /// Baseline task points per day for workload classification.
    #[serde(default = "default_baseline_points")]
    pub baseline_points_per_day: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            default_tz: default_tz(),
            baseline_points_per_day: default_baseline_points(),
        }
    }
}

fn default_agent_name() -> String {
    "ritmo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tz() -> String {
    "America/Bogota".to_string()
}

fn default_baseline_points() -> u32 {
    5
}

/// Daily prompt window configuration.
///
/// The scheduler fires inside an inclusive window of `window_minutes`
/// around each target time, computed in every user's local timezone.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Local hour of the morning prompt (0-23).
    #[serde(default = "default_morning_hour")]
    pub morning_hour: u8,

    /// Local minute of the morning prompt (0-59).
    #[serde(default)]
    pub morning_minute: u8,

    /// Local hour of the evening prompt (0-23).
    #[serde(default = "default_evening_hour")]
    pub evening_hour: u8,

    /// Local minute of the evening prompt (0-59).
    #[serde(default)]
    pub evening_minute: u8,

    /// Window width in minutes around each target time.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,

    /// Debug override: "morning", "evening", or "both" to force
    /// unconditional sends ignoring claims and windows. Breaks the
    /// at-most-once contract; manual testing only.
    #[serde(default)]
    pub force_send: Option<String>,

    /// Debug override: restrict forced sends to a single user id.
    #[serde(default)]
    pub force_user: Option<String>,

    /// Debug override: cap the number of users receiving forced sends.
    #[serde(default)]
    pub force_limit: Option<usize>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            morning_hour: default_morning_hour(),
            morning_minute: 0,
            evening_hour: default_evening_hour(),
            evening_minute: 0,
            window_minutes: default_window_minutes(),
            force_send: None,
            force_user: None,
            force_limit: None,
        }
    }
}

fn default_morning_hour() -> u8 {
    8
}

fn default_evening_hour() -> u8 {
    18
}

fn default_window_minutes() -> u32 {
    10
}

/// Remote evaluator / reason-classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// API key for the scoring model. `None` selects the deterministic
    /// local fallback for both evaluation and reason classification.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for plan/update scoring.
    #[serde(default = "default_eval_model")]
    pub model: String,

    /// Rubric version recorded with each evaluation.
    #[serde(default = "default_rubric_version")]
    pub rubric_version: String,

    /// Base URL of the OpenAI-compatible chat completions API.
    #[serde(default = "default_eval_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_eval_timeout_ms")]
    pub timeout_ms: u64,

    /// Retry attempts for transient failures (429/5xx/timeouts).
    #[serde(default = "default_eval_max_retries")]
    pub max_retries: u32,

    /// Model used for single-label reason classification.
    /// Defaults to `model` when unset.
    #[serde(default)]
    pub reason_model: Option<String>,

    /// Timeout in milliseconds for the reason classifier call.
    #[serde(default = "default_reason_timeout_ms")]
    pub reason_timeout_ms: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_eval_model(),
            rubric_version: default_rubric_version(),
            base_url: default_eval_base_url(),
            timeout_ms: default_eval_timeout_ms(),
            max_retries: default_eval_max_retries(),
            reason_model: None,
            reason_timeout_ms: default_reason_timeout_ms(),
        }
    }
}

fn default_eval_model() -> String {
    "deepseek-chat".to_string()
}

fn default_rubric_version() -> String {
    "v1".to_string()
}

fn default_eval_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_eval_timeout_ms() -> u64 {
    6000
}

fn default_eval_max_retries() -> u32 {
    2
}

fn default_reason_timeout_ms() -> u64 {
    2200
}

/// Telegram delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables delivery.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Per-chunk character ceiling for long messages (128-4096).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Delay between chunks in milliseconds.
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

fn default_chunk_size() -> usize {
    3500
}

fn default_chunk_delay_ms() -> u64 {
    500
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ritmo").join("ritmo.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "ritmo.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Shared bearer secret for the cron trigger and event intake.
    /// When unset, the gateway rejects every authenticated route (fail-closed).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8787
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_windows() {
        let config = RitmoConfig::default();
        assert_eq!(config.schedule.morning_hour, 8);
        assert_eq!(config.schedule.morning_minute, 0);
        assert_eq!(config.schedule.evening_hour, 18);
        assert_eq!(config.schedule.window_minutes, 10);
        assert_eq!(config.agent.baseline_points_per_day, 5);
        assert_eq!(config.agent.default_tz, "America/Bogota");
    }

    #[test]
    fn evaluator_defaults_select_fallback() {
        let config = RitmoConfig::default();
        assert!(config.evaluator.api_key.is_none());
        assert_eq!(config.evaluator.model, "deepseek-chat");
        assert_eq!(config.evaluator.timeout_ms, 6000);
        assert_eq!(config.evaluator.max_retries, 2);
    }

    #[test]
    fn gateway_defaults_are_fail_closed() {
        let config = RitmoConfig::default();
        assert!(config.gateway.bearer_token.is_none());
        assert_eq!(config.gateway.port, 8787);
    }
}
