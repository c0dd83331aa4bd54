// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ritmo daily-cycle engine.
//!
//! This crate provides the foundational port traits, error type, and
//! domain types used throughout the Ritmo workspace. All backends
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RitmoError;
pub use types::{
    AdapterType, Complexity, CycleState, DailyCycle, DailyPatch, Evaluation, ExtractedTask,
    HealthStatus, InboundEvent, MessageKind, MessageRecord, ReasonCode, ReasonEntry,
    ReasonSource, TaskSource, TickOutcome, UserRecord, WorkloadLevel,
};

// Re-export all port traits at crate root.
pub use traits::{Adapter, Evaluator, Notifier, ReasonClassifier, Repository};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ritmo_error_has_all_variants() {
        let _config = RitmoError::Config("test".into());
        let _storage = RitmoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _notify = RitmoError::Notify {
            message: "test".into(),
            source: None,
        };
        let _evaluator = RitmoError::Evaluator {
            message: "test".into(),
            source: None,
        };
        let _timeout = RitmoError::Timeout {
            duration: std::time::Duration::from_secs(6),
        };
        let _unsupported = RitmoError::Unsupported("expire_stale_cycles".into());
        let _internal = RitmoError::Internal("test".into());
    }

    #[test]
    fn all_port_traits_are_exported() {
        // Compile-time check that every port trait is accessible through
        // the public API.
        fn _assert_adapter<T: Adapter>() {}
        fn _assert_repository<T: Repository>() {}
        fn _assert_notifier<T: Notifier>() {}
        fn _assert_evaluator<T: Evaluator>() {}
        fn _assert_classifier<T: ReasonClassifier>() {}
    }

    #[test]
    fn reason_code_set_is_closed_at_thirteen() {
        use strum::IntoEnumIterator;
        // 12 real codes plus Other for the LLM escalation path.
        assert_eq!(ReasonCode::iter().count(), 13);
    }
}
