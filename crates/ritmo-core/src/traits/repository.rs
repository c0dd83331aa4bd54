// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository port: durable state for users, cycles, messages, tasks, reasons.

use async_trait::async_trait;

use crate::error::RitmoError;
use crate::types::{
    CycleState, DailyCycle, DailyPatch, ExtractedTask, MessageRecord, ReasonEntry, UserRecord,
};

/// Durable storage consumed by the orchestrator and the scheduler.
///
/// Every method is mandatory. A backend that cannot support a behavior
/// returns [`RitmoError::Unsupported`] rather than being silently absent.
///
/// The two `claim_*` methods are the engine's only concurrency-correctness
/// mechanism: each must be a single atomic conditional update
/// (`SET x = v WHERE x IS NULL`, success = rows affected), never
/// read-then-write.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Creates the user on first contact or refreshes `chat_id`/`tz`.
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), RitmoError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, RitmoError>;

    async fn get_all_users(&self) -> Result<Vec<UserRecord>, RitmoError>;

    async fn get_daily_by_date(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailyCycle>, RitmoError>;

    /// Creates a cycle in the given state. Creating twice for the same
    /// (user, date) reuses the existing row.
    async fn create_daily(
        &self,
        user_id: &str,
        date: &str,
        state: CycleState,
    ) -> Result<DailyCycle, RitmoError>;

    /// Fetches the (user, date) cycle, creating it as `PendingMorning` if absent.
    async fn get_or_create_daily(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<DailyCycle, RitmoError>;

    async fn set_daily_state(&self, daily_id: i64, state: CycleState) -> Result<(), RitmoError>;

    /// Applies the set fields of the patch; an empty patch is a no-op.
    async fn patch_daily(&self, daily_id: i64, patch: &DailyPatch) -> Result<(), RitmoError>;

    /// Claims the morning prompt slot. Returns true for exactly one caller
    /// per cycle, even under concurrent invocation.
    async fn claim_morning_prompt(&self, daily_id: i64, epoch: i64) -> Result<bool, RitmoError>;

    /// Claims the evening prompt slot; same at-most-once contract.
    async fn claim_evening_prompt(&self, daily_id: i64, epoch: i64) -> Result<bool, RitmoError>;

    /// Appends a message to the audit trail. Replays of the same
    /// (provider, provider_event_id) insert nothing.
    async fn insert_message(&self, message: &MessageRecord) -> Result<(), RitmoError>;

    /// Replaces the cycle's task list wholesale (delete + insert).
    async fn insert_tasks(
        &self,
        daily_id: i64,
        user_id: &str,
        tasks: &[ExtractedTask],
    ) -> Result<(), RitmoError>;

    /// Upserts reasons per (daily_id, code); on conflict the
    /// higher-confidence row wins for confidence/source/model_version.
    async fn upsert_reasons(
        &self,
        daily_id: i64,
        reasons: &[ReasonEntry],
    ) -> Result<(), RitmoError>;

    /// Text of the first morning-kind message of the cycle, if any.
    async fn get_first_morning_text(&self, daily_id: i64) -> Result<Option<String>, RitmoError>;

    /// Whether an inbound event was already recorded (idempotent dedup).
    async fn has_event(&self, provider: &str, event_id: &str) -> Result<bool, RitmoError>;

    /// Marks the user's unfinished cycles before `date` as expired.
    /// Returns the number of cycles transitioned.
    async fn expire_stale_cycles(&self, user_id: &str, date: &str) -> Result<u64, RitmoError>;
}
