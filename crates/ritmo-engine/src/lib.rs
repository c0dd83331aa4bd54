// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily-cycle orchestration engine.
//!
//! - [`CycleOrchestrator`]: per-user state machine driven by inbound events
//! - [`WindowScheduler`]: cron-driven prompt delivery with atomic claims
//! - [`ReasonTagger`]: multi-label heuristic over the closed reason codes
//! - [`HeuristicEvaluator`]: deterministic local scoring fallback
//! - task extraction and workload classification for morning plans

pub mod clock;
pub mod heuristic;
pub mod normalize;
pub mod orchestrator;
pub mod reasons;
pub mod scheduler;
pub mod texts;
pub mod workload;

pub use heuristic::HeuristicEvaluator;
pub use orchestrator::CycleOrchestrator;
pub use reasons::{ReasonTagger, TaggedReason, HEURISTIC_VERSION};
pub use scheduler::WindowScheduler;
