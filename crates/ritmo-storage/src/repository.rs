// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the Repository port.

use async_trait::async_trait;
use tracing::debug;

use ritmo_config::model::StorageConfig;
use ritmo_core::{
    Adapter, AdapterType, CycleState, DailyCycle, DailyPatch, ExtractedTask, HealthStatus,
    MessageRecord, ReasonEntry, Repository, RitmoError, UserRecord,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed repository.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. Opening runs migrations, so a freshly constructed
/// repository is immediately usable.
pub struct SqliteRepository {
    db: Database,
}

impl SqliteRepository {
    /// Open the database described by the storage configuration.
    pub async fn open(config: &StorageConfig) -> Result<Self, RitmoError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "sqlite repository ready");
        Ok(Self { db })
    }

    /// Access the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Tasks persisted for a cycle, in plan order.
    pub async fn list_tasks(&self, daily_id: i64) -> Result<Vec<ExtractedTask>, RitmoError> {
        queries::tasks::list_tasks(&self.db, daily_id).await
    }

    /// Reasons persisted for a cycle, highest confidence first.
    pub async fn list_reasons(&self, daily_id: i64) -> Result<Vec<ReasonEntry>, RitmoError> {
        queries::reasons::list_reasons(&self.db, daily_id).await
    }
}

#[async_trait]
impl Adapter for SqliteRepository {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Repository
    }

    async fn health_check(&self) -> Result<HealthStatus, RitmoError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RitmoError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("shutdown: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), RitmoError> {
        queries::users::upsert_user(&self.db, user).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, RitmoError> {
        queries::users::get_user(&self.db, user_id).await
    }

    async fn get_all_users(&self) -> Result<Vec<UserRecord>, RitmoError> {
        queries::users::get_all_users(&self.db).await
    }

    async fn get_daily_by_date(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailyCycle>, RitmoError> {
        queries::dailies::get_daily_by_date(&self.db, user_id, date).await
    }

    async fn create_daily(
        &self,
        user_id: &str,
        date: &str,
        state: CycleState,
    ) -> Result<DailyCycle, RitmoError> {
        queries::dailies::create_daily(&self.db, user_id, date, state).await
    }

    async fn get_or_create_daily(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<DailyCycle, RitmoError> {
        queries::dailies::create_daily(&self.db, user_id, date, CycleState::PendingMorning).await
    }

    async fn set_daily_state(&self, daily_id: i64, state: CycleState) -> Result<(), RitmoError> {
        queries::dailies::set_daily_state(&self.db, daily_id, state).await
    }

    async fn patch_daily(&self, daily_id: i64, patch: &DailyPatch) -> Result<(), RitmoError> {
        queries::dailies::patch_daily(&self.db, daily_id, patch).await
    }

    async fn claim_morning_prompt(&self, daily_id: i64, epoch: i64) -> Result<bool, RitmoError> {
        queries::dailies::claim_morning_prompt(&self.db, daily_id, epoch).await
    }

    async fn claim_evening_prompt(&self, daily_id: i64, epoch: i64) -> Result<bool, RitmoError> {
        queries::dailies::claim_evening_prompt(&self.db, daily_id, epoch).await
    }

    async fn insert_message(&self, message: &MessageRecord) -> Result<(), RitmoError> {
        queries::messages::insert_message(&self.db, message).await
    }

    async fn insert_tasks(
        &self,
        daily_id: i64,
        user_id: &str,
        tasks: &[ExtractedTask],
    ) -> Result<(), RitmoError> {
        queries::tasks::replace_tasks(&self.db, daily_id, user_id, tasks).await
    }

    async fn upsert_reasons(
        &self,
        daily_id: i64,
        reasons: &[ReasonEntry],
    ) -> Result<(), RitmoError> {
        queries::reasons::upsert_reasons(&self.db, daily_id, reasons).await
    }

    async fn get_first_morning_text(&self, daily_id: i64) -> Result<Option<String>, RitmoError> {
        queries::messages::get_first_morning_text(&self.db, daily_id).await
    }

    async fn has_event(&self, provider: &str, event_id: &str) -> Result<bool, RitmoError> {
        queries::messages::has_event(&self.db, provider, event_id).await
    }

    async fn expire_stale_cycles(&self, user_id: &str, date: &str) -> Result<u64, RitmoError> {
        queries::dailies::expire_stale(&self.db, user_id, date).await
    }
}
