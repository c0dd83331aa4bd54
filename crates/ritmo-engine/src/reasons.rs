// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-label heuristic tagger for non-completion reasons.
//!
//! Stateless classifier over a fixed lexicon of weighted regex patterns
//! per reason code, ES/EN. Per sentence: pattern weights are summed per
//! code, matches inside a negation window are down-weighted (negated
//! mentions are weak evidence, not absence of evidence), and fixed
//! co-occurrence boosts model correlated codes. Sentence scores are
//! aggregated over the whole text and calibrated to [0,1] confidence.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use ritmo_core::ReasonCode;

use crate::normalize::{normalize_text, split_sentences, tokenize};

/// Version recorded with every heuristic label.
pub const HEURISTIC_VERSION: &str = "heuristic-v2";

const NEGATION_WINDOW: usize = 5;
const NEGATION_FACTOR: f64 = 0.35;
const MAX_OCCURRENCES_PER_PATTERN: usize = 3;
const CALIBRATION_ALPHA: f64 = 2.7;

/// One label produced by the tagger.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedReason {
    pub code: ReasonCode,
    pub confidence: f64,
}

/// Heuristic reason tagger over the closed code set.
#[derive(Debug, Clone)]
pub struct ReasonTagger {
    pub top_k: usize,
    pub min_confidence: f64,
}

impl Default for ReasonTagger {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_confidence: 0.45,
        }
    }
}

struct Pattern {
    re: Regex,
    weight: f64,
}

fn pat(source: &str, weight: f64) -> Pattern {
    // Lexicon patterns are static; a bad one is a programming error.
    #[allow(clippy::expect_used)]
    Pattern {
        re: Regex::new(source).expect("invalid lexicon pattern"),
        weight,
    }
}

static LEXICON: LazyLock<Vec<(ReasonCode, Vec<Pattern>)>> = LazyLock::new(|| {
    use ReasonCode::*;
    vec![
        (
            Impediment,
            vec![
                pat(r"\b(bloquead[oa]s?|bloqueo|bloquear|atasc[ao]|trabad[oa])\b", 2.2),
                pat(r"\b(esperand[oa]|pendiente de|en cola|sin respuesta)\b", 1.6),
                pat(r"\b(acceso|permis[oa]s?|credenciales?)\b", 1.8),
                pat(r"\b(dependenc(ia|ias)|dependant|blocked by)\b", 1.6),
            ],
        ),
        (
            TechDebt,
            vec![
                pat(r"\b(deuda tecnica|tech debt|legacy|monolit[oa])\b", 2.0),
                pat(r"\b(refactor(e|izar|izacion)?|re-estructurar)\b", 1.6),
                pat(r"\b(adecuar|sanear|limpieza de codigo)\b", 1.2),
            ],
        ),
        (
            UnknownTech,
            vec![
                pat(r"\b(no (sabia|conocia)|desconoc(ia|ido))\b", 1.6),
                pat(r"\b(aprend(iendo|izaje)|investig(ar|ando)|tutorial|docu(mentacion)?)\b", 1.6),
                pat(r"\b(por primera vez|rampa|ramp ?up)\b", 1.2),
            ],
        ),
        (
            MajorIncident,
            vec![
                pat(r"\b(incidente|caida|outage|severidad|sev[0-2]|p0|p1)\b", 2.6),
                pat(r"\b(prod(uction)?|en produccion|servicio critico)\b", 1.8),
            ],
        ),
        (
            ScopeChange,
            vec![
                pat(r"\b(cambio de alcance|scope change|pivot|repriorizar|reprioritiz(e|ed|ing))\b", 2.0),
                pat(r"\b(prioridad(es)?|replanificar|plan cambio)\b", 1.4),
            ],
        ),
        (
            Overcommitment,
            vec![
                pat(r"\b(no alcance|no me dio el tiempo|me falt[oó] tiempo|time ran out)\b", 2.0),
                pat(r"\b(much[ao] trabajo|sobrecarg[ao]|overcommit|demasiadas tareas)\b", 1.6),
                pat(r"\b(subestim[ée]?)\b", 1.4),
            ],
        ),
        (
            BlockedDependency,
            vec![
                pat(r"\b(esperand[oa].*(equipo|tercero|proveedor|qa|ux|devops))\b", 2.0),
                pat(r"\b(dependenc(ia|ias) externas|third-?party)\b", 1.6),
            ],
        ),
        (
            MeetingsOverload,
            vec![
                pat(r"\b(reuniones?|meetings?)\b", 1.4),
                pat(r"\b(back-?to-?back|bloque.*(reunion|meeting))\b", 2.0),
            ],
        ),
        (
            RequirementsClarity,
            vec![
                pat(r"\b(requerimientos? (poco )?clar[oa]s?|ambig[uü]edad|no claro)\b", 2.0),
                pat(r"\b(falt[aó] (contexto|detalles|criterios?))\b", 1.4),
            ],
        ),
        (
            ToolingIssues,
            vec![
                pat(r"\b(ci/cd|pipeline|build|deploy|runner|pipelines?)\b", 1.6),
                pat(r"\b(fallo|fallas|rompio|errores?)\b", 1.2),
            ],
        ),
        (
            HealthIssue,
            vec![pat(r"\b(enfermo|salud|gripa|covid|malestar|cita medica)\b", 2.2)],
        ),
        (
            PersonalEmergency,
            vec![pat(r"\b(emergencia (personal|familiar)|imprevisto familiar|urgencia)\b", 2.4)],
        ),
    ]
});

static NEGATIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(no|nunca|ya no|sin|dejo de|deje de|dejamos de)\b",
        r"\b(not|never|no longer|without)\b",
    ]
    .iter()
    .map(|s| Regex::new(s).expect("invalid negation pattern"))
    .collect()
});

struct Boost {
    codes: &'static [ReasonCode],
    delta: f64,
}

static BOOSTS: &[Boost] = &[
    Boost {
        codes: &[ReasonCode::Impediment],
        delta: 0.4,
    },
    Boost {
        codes: &[ReasonCode::Impediment, ReasonCode::BlockedDependency],
        delta: 0.6,
    },
    Boost {
        codes: &[ReasonCode::MajorIncident, ReasonCode::ToolingIssues],
        delta: 0.5,
    },
    Boost {
        codes: &[ReasonCode::Overcommitment, ReasonCode::MeetingsOverload],
        delta: 0.4,
    },
];

fn to_confidence(score: f64) -> f64 {
    if score <= 0.0 {
        return 0.0;
    }
    (1.0 - (-score / CALIBRATION_ALPHA).exp()).clamp(0.0, 1.0)
}

fn sentence_scores(sentence: &str) -> HashMap<ReasonCode, f64> {
    let norm = normalize_text(sentence);
    let tokens = tokenize(&norm);
    let mut per_code: HashMap<ReasonCode, f64> = HashMap::new();

    let negated_before = |token_idx: usize| -> bool {
        let start = token_idx.saturating_sub(NEGATION_WINDOW);
        let window = tokens[start..token_idx.min(tokens.len())].join(" ");
        NEGATIONS.iter().any(|re| re.is_match(&window))
    };

    for (code, patterns) in LEXICON.iter() {
        let mut score = 0.0;
        for pattern in patterns {
            for m in pattern.re.find_iter(&norm).take(MAX_OCCURRENCES_PER_PATTERN) {
                let token_idx = tokenize(&norm[..m.start()]).len();
                let weight = if negated_before(token_idx) {
                    pattern.weight * NEGATION_FACTOR
                } else {
                    pattern.weight
                };
                score += weight;
            }
        }
        if score > 0.0 {
            *per_code.entry(*code).or_default() += score;
        }
    }

    for boost in BOOSTS {
        let present = boost
            .codes
            .iter()
            .all(|c| per_code.get(c).copied().unwrap_or(0.0) > 0.0);
        if present {
            for code in boost.codes {
                *per_code.entry(*code).or_default() += boost.delta;
            }
        }
    }

    per_code
}

impl ReasonTagger {
    pub fn new(top_k: usize, min_confidence: f64) -> Self {
        Self {
            top_k,
            min_confidence,
        }
    }

    /// Tag an update text with up to `top_k` reason codes above the
    /// confidence floor, sorted by confidence descending.
    pub fn tag(&self, text: &str) -> Vec<TaggedReason> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        let mut global: HashMap<ReasonCode, f64> = HashMap::new();
        for sentence in sentences {
            for (code, gain) in sentence_scores(sentence) {
                *global.entry(code).or_default() += gain;
            }
        }

        // Collect in lexicon order so equal confidences tie-break stably.
        let mut tagged: Vec<TaggedReason> = LEXICON
            .iter()
            .filter_map(|(code, _)| {
                let score = global.get(code).copied()?;
                let confidence = to_confidence(score);
                (confidence >= self.min_confidence).then_some(TaggedReason {
                    code: *code,
                    confidence,
                })
            })
            .collect();
        tagged.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        tagged.truncate(self.top_k);
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> Vec<TaggedReason> {
        ReasonTagger::default().tag(text)
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(tag("").is_empty());
        assert!(tag("   \n  ").is_empty());
    }

    #[test]
    fn blocked_update_is_tagged_impediment() {
        let tags = tag("Estoy bloqueado esperando accesos al ambiente.");
        assert_eq!(tags[0].code, ReasonCode::Impediment);
        assert!(tags[0].confidence > 0.6);
    }

    #[test]
    fn production_access_block_is_tagged_impediment() {
        let tags = tag("Estuve bloqueado esperando acceso a producción");
        assert_eq!(tags[0].code, ReasonCode::Impediment);
        assert!(tags[0].confidence >= 0.45);
    }

    #[test]
    fn negated_block_with_smooth_day_yields_nothing() {
        assert!(tag("no bloqueado, todo fluido").is_empty());
    }

    #[test]
    fn negation_downweights_below_floor() {
        assert!(tag("no estoy bloqueado").is_empty());
        assert!(!tag("estoy bloqueado").is_empty());
    }

    #[test]
    fn cooccurrence_boost_lifts_pairs() {
        let tags = tag("Sigo esperando al equipo de QA, bloqueado por la dependencia.");
        let codes: Vec<_> = tags.iter().map(|t| t.code).collect();
        assert!(codes.contains(&ReasonCode::Impediment));
        assert!(codes.contains(&ReasonCode::BlockedDependency));
    }

    #[test]
    fn weak_single_mention_stays_below_floor() {
        // One 1.4-weight mention calibrates to ~0.40, under the 0.45 floor.
        assert!(tag("tuve reuniones").is_empty());
    }

    #[test]
    fn health_mention_passes_floor() {
        let tags = tag("Estuve enfermo todo el día");
        assert_eq!(tags[0].code, ReasonCode::HealthIssue);
    }

    #[test]
    fn at_most_top_k_labels() {
        let text = "Hubo un incidente en produccion. El pipeline de deploy fallo. \
                    Estuve enfermo. Ademas reuniones back-to-back y demasiadas tareas. \
                    Sigo bloqueado esperando accesos.";
        let tags = tag(text);
        assert!(tags.len() <= 3);
        // Sorted by confidence descending.
        for pair in tags.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn confidence_calibration_is_bounded() {
        let text = "bloqueado bloqueado bloqueado bloqueado bloqueado";
        let tags = tag(text);
        assert!(tags[0].confidence <= 1.0);
    }

    #[test]
    fn english_patterns_match() {
        let tags = tag("Time ran out, too many meetings");
        let codes: Vec<_> = tags.iter().map(|t| t.code).collect();
        assert!(codes.contains(&ReasonCode::Overcommitment));
        assert!(codes.contains(&ReasonCode::MeetingsOverload));
    }
}
