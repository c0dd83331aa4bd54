// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deepseek-backed evaluator and reason classifier.
//!
//! Both adapters talk to the same OpenAI-compatible chat completions
//! endpoint through [`client::ChatClient`] and degrade gracefully: the
//! evaluator falls back to local heuristic scoring, the classifier to
//! [`ritmo_core::ReasonCode::Other`].

pub mod classifier;
pub mod client;
pub mod evaluator;
pub mod parse;

pub use classifier::DeepseekReasonClassifier;
pub use evaluator::DeepseekEvaluator;
