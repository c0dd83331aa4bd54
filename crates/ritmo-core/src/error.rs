// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ritmo daily-cycle engine.

use thiserror::Error;

/// The primary error type used across all Ritmo ports and core operations.
#[derive(Debug, Error)]
pub enum RitmoError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, constraint).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Notifier errors (delivery failure, chat API error, chunking).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote evaluator/classifier errors (API failure, malformed response).
    #[error("evaluator error: {message}")]
    Evaluator {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The backend does not support the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
