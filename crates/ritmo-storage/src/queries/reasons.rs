// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reason-label operations. One row per (daily_id, code); re-labeling a
//! cycle only ever raises confidence, never lowers it.

use ritmo_core::{ReasonEntry, RitmoError};
use rusqlite::params;

use crate::database::Database;
use crate::queries::parse_col;

pub async fn upsert_reasons(
    db: &Database,
    daily_id: i64,
    reasons: &[ReasonEntry],
) -> Result<(), RitmoError> {
    let reasons = reasons.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO reasons
                         (daily_id, code, confidence, source, raw, message_id, model_version)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT (daily_id, code) DO UPDATE SET
                         confidence    = excluded.confidence,
                         source        = excluded.source,
                         raw           = excluded.raw,
                         message_id    = excluded.message_id,
                         model_version = excluded.model_version
                     WHERE excluded.confidence > reasons.confidence",
                )?;
                for reason in &reasons {
                    stmt.execute(params![
                        daily_id,
                        reason.code.to_string(),
                        reason.confidence,
                        reason.source.to_string(),
                        reason.raw,
                        reason.message_id,
                        reason.model_version,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Reasons of a cycle, highest confidence first.
pub async fn list_reasons(db: &Database, daily_id: i64) -> Result<Vec<ReasonEntry>, RitmoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT code, confidence, source, raw, message_id, model_version
                 FROM reasons WHERE daily_id = ?1 ORDER BY confidence DESC, code ASC",
            )?;
            let reasons = stmt
                .query_map(params![daily_id], |row| {
                    let code: String = row.get(0)?;
                    let source: String = row.get(2)?;
                    Ok(ReasonEntry {
                        code: parse_col(0, &code)?,
                        confidence: row.get(1)?,
                        source: parse_col(2, &source)?,
                        raw: row.get(3)?,
                        message_id: row.get(4)?,
                        model_version: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reasons)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
