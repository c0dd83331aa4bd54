// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes;
//! atomicity of the claim statements depends on the single-writer model.

use std::path::Path;

use ritmo_core::RitmoError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Convert a tokio_rusqlite error into RitmoError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> RitmoError {
    RitmoError::Storage {
        source: Box::new(e),
    }
}

/// Owned handle to the SQLite database.
///
/// Opening runs all pending migrations and applies connection PRAGMAs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`.
    ///
    /// Parent directories are created, PRAGMAs are applied, and embedded
    /// migrations run before the handle is returned.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, RitmoError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| RitmoError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(path.to_string())
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let migration_result = conn
            .call(move |conn| {
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                    conn.pragma_update(None, "synchronous", "NORMAL")?;
                }
                conn.pragma_update(None, "busy_timeout", 5000)?;
                Ok(crate::migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?;

        migration_result?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Access the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection thread.
    pub async fn close(self) -> Result<(), RitmoError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        Ok(())
    }
}
