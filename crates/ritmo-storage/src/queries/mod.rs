// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each module owns the SQL for one table.

pub mod dailies;
pub mod messages;
pub mod reasons;
pub mod tasks;
pub mod users;

/// Parse a TEXT column into an enum, reporting failures as conversion errors.
pub(crate) fn parse_col<T>(idx: usize, s: &str) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
