// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Routes:
//! - GET /health (unauthenticated)
//! - POST /v1/cron/tick (bearer auth)
//! - POST /v1/events (bearer auth)

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use ritmo_config::model::GatewayConfig;
use ritmo_core::RitmoError;
use ritmo_engine::{CycleOrchestrator, WindowScheduler};

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Arc<CycleOrchestrator>,
    pub scheduler: Arc<WindowScheduler>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Assembles the full router with auth wired in.
pub fn build_router(state: GatewayState, auth: AuthConfig) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/cron/tick", post(handlers::post_cron_tick))
        .route("/v1/events", post(handlers::post_events))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
}

/// Binds and serves until the process is stopped.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), RitmoError> {
    let auth = AuthConfig {
        bearer_token: config.bearer_token.clone(),
    };
    let app = build_router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RitmoError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| RitmoError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
