// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Ritmo daily-cycle engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for users, daily cycles, messages, tasks, and reasons.
//! The atomic prompt-claim statements live in [`queries::dailies`].

pub mod database;
pub mod migrations;
pub mod queries;
pub mod repository;

pub use database::Database;
pub use repository::SqliteRepository;
