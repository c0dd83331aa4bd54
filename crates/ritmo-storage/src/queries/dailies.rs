// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily-cycle operations, including the atomic prompt claims.

use ritmo_core::{CycleState, DailyCycle, DailyPatch, RitmoError};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::queries::parse_col;

const DAILY_COLS: &str = "id, user_id, date, state, score, eval_model, eval_rubric, \
     eval_rationale, morning_prompt_at, evening_prompt_at, first_morning_at, \
     first_update_at, closed_at, workload_points, workload_level";

pub async fn get_daily_by_date(
    db: &Database,
    user_id: &str,
    date: &str,
) -> Result<Option<DailyCycle>, RitmoError> {
    let user_id = user_id.to_string();
    let date = date.to_string();
    db.connection()
        .call(move |conn| {
            let daily = conn
                .query_row(
                    &format!(
                        "SELECT {DAILY_COLS} FROM daily_cycles WHERE user_id = ?1 AND date = ?2"
                    ),
                    params![user_id, date],
                    row_to_daily,
                )
                .optional()?;
            Ok(daily)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a cycle for (user, date), or return the existing row unchanged.
///
/// The UNIQUE(user_id, date) constraint plus `INSERT OR IGNORE` makes this
/// safe to call from replayed events.
pub async fn create_daily(
    db: &Database,
    user_id: &str,
    date: &str,
    state: CycleState,
) -> Result<DailyCycle, RitmoError> {
    let user_id = user_id.to_string();
    let date = date.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO daily_cycles (user_id, date, state) VALUES (?1, ?2, ?3)",
                params![user_id, date, state.to_string()],
            )?;
            conn.query_row(
                &format!("SELECT {DAILY_COLS} FROM daily_cycles WHERE user_id = ?1 AND date = ?2"),
                params![user_id, date],
                row_to_daily,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn set_daily_state(
    db: &Database,
    daily_id: i64,
    state: CycleState,
) -> Result<(), RitmoError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE daily_cycles SET state = ?1, updated_at = unixepoch() WHERE id = ?2",
                params![state.to_string(), daily_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply the set fields of a patch. Patch fields only ever move a column
/// forward from NULL, so COALESCE on the bind value is sufficient.
pub async fn patch_daily(
    db: &Database,
    daily_id: i64,
    patch: &DailyPatch,
) -> Result<(), RitmoError> {
    if patch.is_empty() {
        return Ok(());
    }
    let patch = patch.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE daily_cycles SET
                     first_morning_at = COALESCE(?1, first_morning_at),
                     first_update_at  = COALESCE(?2, first_update_at),
                     closed_at        = COALESCE(?3, closed_at),
                     score            = COALESCE(?4, score),
                     eval_model      = COALESCE(?5, eval_model),
                     eval_rubric     = COALESCE(?6, eval_rubric),
                     eval_rationale  = COALESCE(?7, eval_rationale),
                     workload_points = COALESCE(?8, workload_points),
                     workload_level  = COALESCE(?9, workload_level),
                     updated_at      = unixepoch()
                 WHERE id = ?10",
                params![
                    patch.first_morning_at,
                    patch.first_update_at,
                    patch.closed_at,
                    patch.score,
                    patch.eval_model,
                    patch.eval_rubric,
                    patch.eval_rationale,
                    patch.workload_points,
                    patch.workload_level.map(|l| l.to_string()),
                    daily_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically claim the morning prompt slot. True for exactly one caller.
pub async fn claim_morning_prompt(
    db: &Database,
    daily_id: i64,
    epoch: i64,
) -> Result<bool, RitmoError> {
    claim_slot(db, "morning_prompt_at", daily_id, epoch).await
}

/// Atomically claim the evening prompt slot. True for exactly one caller.
pub async fn claim_evening_prompt(
    db: &Database,
    daily_id: i64,
    epoch: i64,
) -> Result<bool, RitmoError> {
    claim_slot(db, "evening_prompt_at", daily_id, epoch).await
}

async fn claim_slot(
    db: &Database,
    column: &'static str,
    daily_id: i64,
    epoch: i64,
) -> Result<bool, RitmoError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                &format!(
                    "UPDATE daily_cycles SET {column} = ?1, updated_at = unixepoch()
                     WHERE id = ?2 AND {column} IS NULL"
                ),
                params![epoch, daily_id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Expire the user's unfinished cycles older than `before_date`.
pub async fn expire_stale(
    db: &Database,
    user_id: &str,
    before_date: &str,
) -> Result<u64, RitmoError> {
    let user_id = user_id.to_string();
    let before_date = before_date.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE daily_cycles SET state = 'expired', updated_at = unixepoch()
                 WHERE user_id = ?1 AND date < ?2
                   AND state IN ('pending_morning', 'pending_update', 'needs_followup')",
                params![user_id, before_date],
            )?;
            Ok(affected as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn row_to_daily(row: &rusqlite::Row<'_>) -> Result<DailyCycle, rusqlite::Error> {
    let state: String = row.get(3)?;
    let level: Option<String> = row.get(14)?;
    Ok(DailyCycle {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        state: parse_col(3, &state)?,
        score: row.get(4)?,
        eval_model: row.get(5)?,
        eval_rubric: row.get(6)?,
        eval_rationale: row.get(7)?,
        morning_prompt_at: row.get(8)?,
        evening_prompt_at: row.get(9)?,
        first_morning_at: row.get(10)?,
        first_update_at: row.get(11)?,
        closed_at: row.get(12)?,
        workload_points: row.get(13)?,
        workload_level: level.map(|l| parse_col(14, &l)).transpose()?,
    })
}
