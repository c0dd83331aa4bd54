// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evaluator and reason-classifier ports.

use async_trait::async_trait;

use crate::types::{Evaluation, ReasonCode};

/// Scores an evening update against the morning plan.
///
/// `evaluate` is infallible by contract: backends degrade to a
/// deterministic local result rather than surfacing remote failures.
#[async_trait]
pub trait Evaluator: Send + Sync + 'static {
    async fn evaluate(&self, plan: &str, update: &str) -> Evaluation;
}

/// Single-label classifier over the closed reason-code set, used as the
/// escalation path when the heuristic tagger is empty or ambiguous.
///
/// Infallible by contract: any failure answers [`ReasonCode::Other`].
#[async_trait]
pub trait ReasonClassifier: Send + Sync + 'static {
    async fn classify(&self, plan: Option<&str>, update: &str) -> ReasonCode;

    /// Version string recorded alongside labels this classifier produced.
    fn model_version(&self) -> String {
        "llm".to_string()
    }
}
