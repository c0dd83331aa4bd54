// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic task extraction from morning plans and workload
//! classification against a baseline of points per day.

use std::sync::LazyLock;

use regex::Regex;

use ritmo_core::{Complexity, ExtractedTask, TaskSource, WorkloadLevel};

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*\u{2022}]\s+").expect("invalid bullet pattern")
});
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+[.)]\s+").expect("invalid numbering pattern")
});
static CONNECTOR_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(y|and)\b").expect("invalid connector pattern")
});
static BIG_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(migrar|refactor|infraestructura|integrar|desplegar|deploy|migrat|infra|integration)\b",
    )
    .expect("invalid keyword pattern")
});
static RESEARCH_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(investigar|aprender|tutorial|documentacion|investigate|learn)\b")
        .expect("invalid keyword pattern")
});

/// Connector count: "y"/"and" words plus `;`/`,` joining two words.
fn count_connectors(text: &str) -> usize {
    let words = CONNECTOR_WORDS.find_iter(text).count();
    let chars: Vec<char> = text.chars().collect();
    let glued = chars
        .windows(3)
        .filter(|w| (w[1] == ';' || w[1] == ',') && w[0].is_alphanumeric() && w[2].is_alphanumeric())
        .count();
    words + glued
}

/// Rule table mapping line shape to an estimated complexity.
fn estimate_complexity(text: &str) -> Complexity {
    let wc = text.split_whitespace().count();
    let connectors = count_connectors(text);
    let big = BIG_KEYWORDS.is_match(text);
    let research = RESEARCH_KEYWORDS.is_match(text);

    let mut complexity = Complexity::S;
    if wc <= 5 && connectors == 0 && !big {
        complexity = Complexity::Xs;
    } else if wc <= 10 && connectors <= 1 && !big {
        complexity = Complexity::S;
    } else if wc <= 18 && connectors <= 2 {
        complexity = Complexity::M;
    } else if big || connectors >= 2 || wc > 18 {
        complexity = Complexity::L;
    }
    if big && connectors >= 2 {
        complexity = Complexity::Xl;
    }
    if research && complexity == Complexity::Xs {
        complexity = Complexity::S;
    }
    complexity
}

/// Split a morning plan into tasks: one per non-empty line, with leading
/// bullet or number markers stripped.
pub fn extract_tasks(plan: &str) -> Vec<ExtractedTask> {
    let mut tasks = Vec::new();
    let mut pos = 1u32;

    for line in plan.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let unbulleted = BULLET.replace(line, "");
        let stripped = NUMBERED.replace(&unbulleted, "");
        let text: String = stripped
            .chars()
            .filter(|c| !matches!(c, '"' | '\u{201c}' | '\u{201d}'))
            .collect();
        let text = text.trim().to_string();
        if text.is_empty() {
            continue;
        }

        let complexity = estimate_complexity(&text);
        tasks.push(ExtractedTask {
            pos,
            text,
            complexity,
            points: complexity.points(),
            source: TaskSource::Heuristic,
        });
        pos += 1;
    }
    tasks
}

/// Classify total points against the baseline: below 0.7x is low, above
/// 1.3x is high.
pub fn classify_workload(total_points: u32, baseline_points_per_day: u32) -> WorkloadLevel {
    let baseline = f64::from(baseline_points_per_day);
    let total = f64::from(total_points);
    if total < 0.7 * baseline {
        WorkloadLevel::Low
    } else if total > 1.3 * baseline {
        WorkloadLevel::High
    } else {
        WorkloadLevel::Normal
    }
}
