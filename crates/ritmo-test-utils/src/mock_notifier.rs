// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier that captures outbound sends for assertion in tests.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ritmo_core::{Notifier, RitmoError};

/// A mock notifier for testing.
///
/// Every send is captured as a `(user_id, text)` pair. Sends to user ids
/// registered via [`fail_for`](MockNotifier::fail_for) return an error,
/// which lets tests exercise per-user failure isolation.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<HashSet<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured sends, in order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    /// Count of captured sends.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Captured sends addressed to one user.
    pub async fn sent_to(&self, user_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Make every future send to `user_id` fail.
    pub async fn fail_for(&self, user_id: &str) {
        self.failing.lock().await.insert(user_id.to_string());
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<(), RitmoError> {
        if self.failing.lock().await.contains(user_id) {
            return Err(RitmoError::Notify {
                message: format!("mock delivery failure for {user_id}"),
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((user_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_chunks(&self, user_id: &str, text: &str) -> Result<(), RitmoError> {
        self.send_text(user_id, text).await
    }
}
