// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier backed by the Telegram Bot API.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use ritmo_config::model::TelegramConfig;
use ritmo_core::{Adapter, AdapterType, HealthStatus, Notifier, RitmoError};

use crate::split::split_chunks;

const API_BASE_URL: &str = "https://api.telegram.org";

/// Sends cycle prompts and acknowledgements through a Telegram bot.
///
/// `user_id` on the port is the Telegram chat id; the engine resolves
/// users to chats before delivery.
pub struct TelegramNotifier {
    client: reqwest::Client,
    base_url: String,
    token: String,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl TelegramNotifier {
    /// Builds the notifier, or `None` when no bot token is configured.
    pub fn from_config(config: &TelegramConfig) -> Result<Option<Self>, RitmoError> {
        let Some(token) = config.bot_token.as_deref().map(str::trim).filter(|t| !t.is_empty())
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RitmoError::Notify {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Some(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            token: token.to_string(),
            chunk_size: config.chunk_size.clamp(128, 4096),
            chunk_delay: Duration::from_millis(config.chunk_delay_ms.min(10_000)),
        }))
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), RitmoError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RitmoError::Notify {
                message: format!("sendMessage request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail: String = raw.chars().take(500).collect();
            return Err(RitmoError::Notify {
                message: format!("sendMessage returned {status}: {detail}"),
                source: None,
            });
        }
        debug!(chat_id, len = text.chars().count(), "message delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<(), RitmoError> {
        self.send_message(user_id, text).await
    }

    async fn send_chunks(&self, user_id: &str, text: &str) -> Result<(), RitmoError> {
        let chunks = split_chunks(text, self.chunk_size);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            self.send_message(user_id, chunk).await?;
            if i < last && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Adapter for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, RitmoError> {
        let url = format!("{}/bot{}/getMe", self.base_url, self.token);
        match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(r) => Ok(HealthStatus::Unhealthy(format!(
                "getMe returned {}",
                r.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("getMe failed: {e}"))),
        }
    }
}
