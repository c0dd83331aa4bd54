// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions for the Ritmo engine.
//!
//! All ports use `#[async_trait]` for dynamic dispatch compatibility and
//! extend the [`Adapter`] base trait through their concrete backends.

pub mod adapter;
pub mod evaluator;
pub mod notifier;
pub mod repository;

pub use adapter::Adapter;
pub use evaluator::{Evaluator, ReasonClassifier};
pub use notifier::Notifier;
pub use repository::Repository;
