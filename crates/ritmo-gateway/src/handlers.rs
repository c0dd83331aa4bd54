// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers: health, cron trigger, and event intake.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use ritmo_core::{InboundEvent, TickOutcome};

use crate::server::GatewayState;

/// Request body for POST /v1/events: an already-normalized inbound
/// message from a channel adapter or webhook bridge.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub provider: String,
    #[serde(default)]
    pub event_id: Option<String>,
    /// `"message"` (default) or `"command"`.
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    /// The slash command, e.g. `/start`; falls back to `text` when absent.
    #[serde(default)]
    pub command: Option<String>,
    pub user: EventUser,
    pub chat: EventChat,
    pub text: String,
    /// Epoch seconds.
    pub ts: i64,
}

#[derive(Debug, Deserialize)]
pub struct EventUser {
    pub id: String,
    #[serde(default)]
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventChat {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub ok: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health (unauthenticated, for uptime probes).
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/cron/tick
///
/// Runs one scheduler pass at the current instant. Idempotent within a
/// window thanks to the per-slot claims, so an over-eager cron that
/// fires twice sends nothing twice.
pub async fn post_cron_tick(State(state): State<GatewayState>) -> Response {
    let now = chrono::Utc::now().timestamp();
    match state.scheduler.tick(now).await {
        Ok(TickOutcome { morning, evening }) => {
            Json(serde_json::json!({ "morning": morning, "evening": evening })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler tick failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /v1/events
///
/// Hands the event to the orchestrator, which classifies it from the
/// user's cycle state. `type = "command"` events are routed as slash
/// commands instead. Replayed event ids answer 200 without effect.
pub async fn post_events(
    State(state): State<GatewayState>,
    Json(body): Json<EventRequest>,
) -> Response {
    let is_command = body.event_type.as_deref() == Some("command");
    let command = body.command.clone().unwrap_or_else(|| body.text.clone());
    let event = InboundEvent {
        provider: body.provider,
        event_id: body.event_id,
        user_id: body.user.id,
        chat_id: body.chat.id,
        tz: body.user.tz,
        text: body.text,
        ts: body.ts,
        kind: None,
    };

    let outcome = if is_command {
        state.orchestrator.handle_command(&event, &command).await
    } else {
        state.orchestrator.handle(&event).await
    };
    match outcome {
        Ok(()) => Json(EventResponse { ok: true }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "event handling failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
