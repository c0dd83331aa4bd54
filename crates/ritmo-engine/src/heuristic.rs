// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic local scoring used when no remote evaluator is
//! configured, and as the degradation target when the remote one fails.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use ritmo_core::{Evaluation, Evaluator};

use crate::normalize::strip_diacritics;

static NOT_DONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\bno\b|\bno logré\b|\bno pude\b|pendiente)").expect("invalid pattern")
});

/// Word-overlap evaluator: scores an update by how much of the plan's
/// vocabulary it echoes, with a hard cap when the update admits failure.
pub struct HeuristicEvaluator {
    model: String,
    rubric_version: String,
}

impl HeuristicEvaluator {
    pub fn new(model: impl Into<String>, rubric_version: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            rubric_version: rubric_version.into(),
        }
    }

    fn build(&self, score: u8) -> Evaluation {
        let (rationale, advice) = if score == 100 {
            (
                "Plan y resultado alineados (heurística).",
                "Sigue con la misma disciplina.",
            )
        } else {
            (
                "No se encontró evidencia fuerte de cumplimiento (heurística).",
                "Define 1–3 objetivos concretos y medibles para mañana.",
            )
        };
        Evaluation {
            score,
            rationale: rationale.to_string(),
            advice: advice.to_string(),
            model: self.model.clone(),
            rubric_version: self.rubric_version.clone(),
        }
    }
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self::new("heuristic", "v1")
    }
}

#[async_trait]
impl Evaluator for HeuristicEvaluator {
    async fn evaluate(&self, plan: &str, update: &str) -> Evaluation {
        self.build(heuristic_score(plan, update))
    }
}

fn significant_words(s: &str) -> HashSet<String> {
    strip_diacritics(&s.to_lowercase())
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Deterministic completion score in [0, 100].
///
/// An empty update scores 50 (nothing to judge); an explicit admission
/// of non-completion caps at 60; otherwise the plan-vocabulary overlap
/// ratio picks 100, 90, or 70.
pub fn heuristic_score(plan: &str, update: &str) -> u8 {
    let plan_words = significant_words(plan);
    let update_words = significant_words(update);
    if update_words.is_empty() {
        return 50;
    }

    let overlap = update_words.intersection(&plan_words).count();
    let ratio = overlap as f64 / plan_words.len().max(1) as f64;

    if NOT_DONE.is_match(update) {
        return 60;
    }
    let len = update.chars().count();
    if ratio >= 0.5 && len >= 20 {
        return 100;
    }
    if ratio >= 0.3 && len >= 20 {
        return 90;
    }
    70
}
