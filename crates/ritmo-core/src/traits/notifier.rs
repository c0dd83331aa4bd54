// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier port: outbound message delivery.

use async_trait::async_trait;

use crate::error::RitmoError;

/// Message delivery consumed by the orchestrator and the scheduler.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Sends a single text message to the user.
    async fn send_text(&self, user_id: &str, text: &str) -> Result<(), RitmoError>;

    /// Sends a long text as multiple messages, respecting the channel's
    /// per-message size ceiling with a short delay between chunks.
    async fn send_chunks(&self, user_id: &str, text: &str) -> Result<(), RitmoError>;
}
