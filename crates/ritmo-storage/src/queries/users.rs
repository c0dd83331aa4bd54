// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use ritmo_core::{RitmoError, UserRecord};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;

/// Insert a user, or refresh chat_id/tz/provider if already known.
pub async fn upsert_user(db: &Database, user: &UserRecord) -> Result<(), RitmoError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (user_id, chat_id, tz, provider)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id) DO UPDATE SET
                     chat_id = excluded.chat_id,
                     tz = excluded.tz,
                     provider = excluded.provider,
                     updated_at = unixepoch()",
                params![user.user_id, user.chat_id, user.tz, user.provider],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_user(db: &Database, user_id: &str) -> Result<Option<UserRecord>, RitmoError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let user = conn
                .query_row(
                    "SELECT user_id, chat_id, tz, provider FROM users WHERE user_id = ?1",
                    params![user_id],
                    row_to_user,
                )
                .optional()?;
            Ok(user)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All registered users, ordered by first contact.
pub async fn get_all_users(db: &Database) -> Result<Vec<UserRecord>, RitmoError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, chat_id, tz, provider FROM users ORDER BY created_at ASC",
            )?;
            let users = stmt
                .query_map([], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> Result<UserRecord, rusqlite::Error> {
    Ok(UserRecord {
        user_id: row.get(0)?,
        chat_id: row.get(1)?,
        tz: row.get(2)?,
        provider: row.get(3)?,
    })
}
