// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extracted-task operations. The task list for a cycle is always
//! replaced wholesale so re-processing a plan never duplicates rows.

use ritmo_core::{ExtractedTask, RitmoError};
use rusqlite::params;

use crate::database::Database;
use crate::queries::parse_col;

pub async fn replace_tasks(
    db: &Database,
    daily_id: i64,
    user_id: &str,
    tasks: &[ExtractedTask],
) -> Result<(), RitmoError> {
    let user_id = user_id.to_string();
    let tasks = tasks.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tasks WHERE daily_id = ?1", params![daily_id])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO tasks (daily_id, user_id, pos, text, complexity, points, source)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                for task in &tasks {
                    stmt.execute(params![
                        daily_id,
                        user_id,
                        task.pos,
                        task.text,
                        task.complexity.to_string(),
                        task.points,
                        task.source.to_string(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Tasks of a cycle in plan order.
pub async fn list_tasks(db: &Database, daily_id: i64) -> Result<Vec<ExtractedTask>, RitmoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT pos, text, complexity, points, source
                 FROM tasks WHERE daily_id = ?1 ORDER BY pos ASC",
            )?;
            let tasks = stmt
                .query_map(params![daily_id], |row| {
                    let complexity: String = row.get(2)?;
                    let source: String = row.get(4)?;
                    Ok(ExtractedTask {
                        pos: row.get(0)?,
                        text: row.get(1)?,
                        complexity: parse_col(2, &complexity)?,
                        points: row.get(3)?,
                        source: parse_col(4, &source)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
