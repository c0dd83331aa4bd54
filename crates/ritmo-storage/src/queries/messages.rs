// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message audit-trail operations.

use ritmo_core::{MessageRecord, RitmoError};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;

/// Append a message. Replays of the same (provider, provider_event_id)
/// hit the UNIQUE constraint and insert nothing.
pub async fn insert_message(db: &Database, msg: &MessageRecord) -> Result<(), RitmoError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO messages
                     (daily_id, user_id, chat_id, provider, provider_message_id,
                      provider_event_id, kind, text, ts)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    msg.daily_id,
                    msg.user_id,
                    msg.chat_id,
                    msg.provider,
                    msg.provider_message_id,
                    msg.provider_event_id,
                    msg.kind.to_string(),
                    msg.text,
                    msg.ts,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Text of the earliest morning-kind message of a cycle.
pub async fn get_first_morning_text(
    db: &Database,
    daily_id: i64,
) -> Result<Option<String>, RitmoError> {
    db.connection()
        .call(move |conn| {
            let text = conn
                .query_row(
                    "SELECT text FROM messages
                     WHERE daily_id = ?1 AND kind = 'morning'
                     ORDER BY ts ASC, id ASC LIMIT 1",
                    params![daily_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(text)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether an inbound event id was already recorded.
pub async fn has_event(db: &Database, provider: &str, event_id: &str) -> Result<bool, RitmoError> {
    let provider = provider.to_string();
    let event_id = event_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM messages WHERE provider = ?1 AND provider_event_id = ?2)",
                params![provider, event_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
