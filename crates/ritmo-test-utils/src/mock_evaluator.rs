// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock evaluator and classifier with scripted answers.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ritmo_core::{Evaluation, Evaluator, ReasonClassifier, ReasonCode};

/// A mock evaluator for testing.
///
/// Scripted evaluations are returned in FIFO order; once exhausted, every
/// call answers the fixed default score.
pub struct MockEvaluator {
    scripted: Mutex<VecDeque<Evaluation>>,
    default_score: u8,
}

impl MockEvaluator {
    /// Evaluator that always answers `score`.
    pub fn with_score(score: u8) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default_score: score,
        }
    }

    /// Queue one scripted evaluation.
    pub async fn push(&self, evaluation: Evaluation) {
        self.scripted.lock().await.push_back(evaluation);
    }

    /// Queue one scripted score with default metadata.
    pub async fn push_score(&self, score: u8) {
        self.push(Self::canned(score)).await;
    }

    fn canned(score: u8) -> Evaluation {
        Evaluation {
            score,
            rationale: "mock".to_string(),
            advice: "mock".to_string(),
            model: "mock-evaluator".to_string(),
            rubric_version: "test".to_string(),
        }
    }
}

#[async_trait]
impl Evaluator for MockEvaluator {
    async fn evaluate(&self, _plan: &str, _update: &str) -> Evaluation {
        self.scripted
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Self::canned(self.default_score))
    }
}

/// A mock single-label classifier that always answers the same code and
/// counts how often it was consulted.
pub struct MockClassifier {
    code: ReasonCode,
    calls: Mutex<u32>,
}

impl MockClassifier {
    pub fn answering(code: ReasonCode) -> Self {
        Self {
            code,
            calls: Mutex::new(0),
        }
    }

    /// Times `classify` was invoked.
    pub async fn call_count(&self) -> u32 {
        *self.calls.lock().await
    }
}

#[async_trait]
impl ReasonClassifier for MockClassifier {
    async fn classify(&self, _plan: Option<&str>, _update: &str) -> ReasonCode {
        *self.calls.lock().await += 1;
        self.code
    }
}
