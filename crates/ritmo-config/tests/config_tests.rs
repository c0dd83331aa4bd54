// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ritmo configuration system.

use ritmo_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_ritmo_config() {
    let toml = r#"
[agent]
name = "standup-bot"
log_level = "debug"
default_tz = "Europe/Madrid"
baseline_points_per_day = 6

[schedule]
morning_hour = 9
morning_minute = 30
evening_hour = 17
window_minutes = 15

[evaluator]
api_key = "sk-test-123"
model = "deepseek-chat"
timeout_ms = 4000
max_retries = 1

[telegram]
bot_token = "123:ABC"
chunk_size = 2000

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[gateway]
host = "0.0.0.0"
port = 9000
bearer_token = "cron-secret"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "standup-bot");
    assert_eq!(config.agent.default_tz, "Europe/Madrid");
    assert_eq!(config.agent.baseline_points_per_day, 6);
    assert_eq!(config.schedule.morning_hour, 9);
    assert_eq!(config.schedule.morning_minute, 30);
    assert_eq!(config.schedule.evening_hour, 17);
    assert_eq!(config.schedule.window_minutes, 15);
    assert_eq!(config.evaluator.api_key.as_deref(), Some("sk-test-123"));
    assert_eq!(config.evaluator.timeout_ms, 4000);
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.chunk_size, 2000);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("cron-secret"));
}

/// Unknown field in [schedule] section produces an error.
#[test]
fn unknown_field_in_schedule_produces_error() {
    let toml = r#"
[schedule]
morning_huor = 8
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("morning_huor"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "ritmo");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.agent.default_tz, "America/Bogota");
    assert_eq!(config.schedule.morning_hour, 8);
    assert_eq!(config.schedule.evening_hour, 18);
    assert_eq!(config.schedule.window_minutes, 10);
    assert!(config.schedule.force_send.is_none());
    assert!(config.evaluator.api_key.is_none());
    assert_eq!(config.evaluator.base_url, "https://api.deepseek.com/v1");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.storage.wal_mode);
    assert!(config.gateway.bearer_token.is_none());
}

/// Semantic validation runs after deserialization.
#[test]
fn load_and_validate_rejects_semantic_errors() {
    let toml = r#"
[schedule]
morning_hour = 25
"#;
    let errors = load_and_validate_str(toml).expect_err("hour 25 should fail validation");
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("morning_hour")),
        "expected a morning_hour validation error"
    );
}

/// A valid config passes the full load-and-validate path.
#[test]
fn load_and_validate_accepts_valid_config() {
    let toml = r#"
[agent]
default_tz = "America/Mexico_City"

[schedule]
force_send = "both"
force_limit = 2
"#;
    let config = load_and_validate_str(toml).expect("config should validate");
    assert_eq!(config.schedule.force_send.as_deref(), Some("both"));
    assert_eq!(config.schedule.force_limit, Some(2));
}
