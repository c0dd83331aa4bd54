// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the daily-cycle engine.
//!
//! The gateway accepts already-normalized events (channel webhooks are
//! bridged outside this process) and exposes the cron trigger that
//! drives prompt scheduling. Everything except `/health` sits behind a
//! shared bearer secret, fail-closed when unconfigured.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{build_router, start_server, GatewayState};
