// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ritmo integration tests.
//!
//! Provides in-memory implementations of the engine ports for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MemoryRepository`] - In-memory Repository with real claim semantics
//! - [`MockNotifier`] - Notifier that captures outbound sends
//! - [`MockEvaluator`] - Evaluator with scripted results
//! - [`MockClassifier`] - ReasonClassifier with a fixed answer

pub mod memory_repo;
pub mod mock_evaluator;
pub mod mock_notifier;

pub use memory_repo::MemoryRepository;
pub use mock_evaluator::{MockClassifier, MockEvaluator};
pub use mock_notifier::MockNotifier;
