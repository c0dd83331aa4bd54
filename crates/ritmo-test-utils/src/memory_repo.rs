// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory Repository with the same claim and upsert semantics as the
//! SQLite backend. All state lives behind one mutex, so the atomic-claim
//! contract holds under concurrent callers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ritmo_core::{
    CycleState, DailyCycle, DailyPatch, ExtractedTask, MessageRecord, ReasonEntry, Repository,
    RitmoError, UserRecord,
};

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    dailies: Vec<DailyCycle>,
    messages: Vec<MessageRecord>,
    tasks: HashMap<i64, Vec<ExtractedTask>>,
    reasons: HashMap<i64, Vec<ReasonEntry>>,
    next_daily_id: i64,
}

/// In-memory repository for tests.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted messages, in insertion order.
    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.inner.lock().await.messages.clone()
    }

    /// Tasks persisted for a cycle, in plan order.
    pub async fn tasks(&self, daily_id: i64) -> Vec<ExtractedTask> {
        self.inner
            .lock()
            .await
            .tasks
            .get(&daily_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Reasons persisted for a cycle.
    pub async fn reasons(&self, daily_id: i64) -> Vec<ReasonEntry> {
        self.inner
            .lock()
            .await
            .reasons
            .get(&daily_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), RitmoError> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.users.iter_mut().find(|u| u.user_id == user.user_id) {
            existing.chat_id = user.chat_id.clone();
            existing.tz = user.tz.clone();
            existing.provider = user.provider.clone();
        } else {
            inner.users.push(user.clone());
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, RitmoError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn get_all_users(&self) -> Result<Vec<UserRecord>, RitmoError> {
        Ok(self.inner.lock().await.users.clone())
    }

    async fn get_daily_by_date(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailyCycle>, RitmoError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .dailies
            .iter()
            .find(|d| d.user_id == user_id && d.date == date)
            .cloned())
    }

    async fn create_daily(
        &self,
        user_id: &str,
        date: &str,
        state: CycleState,
    ) -> Result<DailyCycle, RitmoError> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner
            .dailies
            .iter()
            .find(|d| d.user_id == user_id && d.date == date)
        {
            return Ok(existing.clone());
        }
        inner.next_daily_id += 1;
        let daily = DailyCycle {
            id: inner.next_daily_id,
            user_id: user_id.to_string(),
            date: date.to_string(),
            state,
            score: None,
            eval_model: None,
            eval_rubric: None,
            eval_rationale: None,
            morning_prompt_at: None,
            evening_prompt_at: None,
            first_morning_at: None,
            first_update_at: None,
            closed_at: None,
            workload_points: None,
            workload_level: None,
        };
        inner.dailies.push(daily.clone());
        Ok(daily)
    }

    async fn get_or_create_daily(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<DailyCycle, RitmoError> {
        self.create_daily(user_id, date, CycleState::PendingMorning)
            .await
    }

    async fn set_daily_state(&self, daily_id: i64, state: CycleState) -> Result<(), RitmoError> {
        let mut inner = self.inner.lock().await;
        let daily = find_daily(&mut inner, daily_id)?;
        daily.state = state;
        Ok(())
    }

    async fn patch_daily(&self, daily_id: i64, patch: &DailyPatch) -> Result<(), RitmoError> {
        let mut inner = self.inner.lock().await;
        let daily = find_daily(&mut inner, daily_id)?;
        if patch.first_morning_at.is_some() {
            daily.first_morning_at = daily.first_morning_at.or(patch.first_morning_at);
        }
        if patch.first_update_at.is_some() {
            daily.first_update_at = daily.first_update_at.or(patch.first_update_at);
        }
        if patch.closed_at.is_some() {
            daily.closed_at = daily.closed_at.or(patch.closed_at);
        }
        if patch.score.is_some() {
            daily.score = patch.score;
        }
        if patch.eval_model.is_some() {
            daily.eval_model = patch.eval_model.clone();
        }
        if patch.eval_rubric.is_some() {
            daily.eval_rubric = patch.eval_rubric.clone();
        }
        if patch.eval_rationale.is_some() {
            daily.eval_rationale = patch.eval_rationale.clone();
        }
        if patch.workload_points.is_some() {
            daily.workload_points = patch.workload_points;
        }
        if patch.workload_level.is_some() {
            daily.workload_level = patch.workload_level;
        }
        Ok(())
    }

    async fn claim_morning_prompt(&self, daily_id: i64, epoch: i64) -> Result<bool, RitmoError> {
        let mut inner = self.inner.lock().await;
        let daily = find_daily(&mut inner, daily_id)?;
        if daily.morning_prompt_at.is_some() {
            return Ok(false);
        }
        daily.morning_prompt_at = Some(epoch);
        Ok(true)
    }

    async fn claim_evening_prompt(&self, daily_id: i64, epoch: i64) -> Result<bool, RitmoError> {
        let mut inner = self.inner.lock().await;
        let daily = find_daily(&mut inner, daily_id)?;
        if daily.evening_prompt_at.is_some() {
            return Ok(false);
        }
        daily.evening_prompt_at = Some(epoch);
        Ok(true)
    }

    async fn insert_message(&self, message: &MessageRecord) -> Result<(), RitmoError> {
        let mut inner = self.inner.lock().await;
        if let Some(event_id) = &message.provider_event_id {
            let seen = inner.messages.iter().any(|m| {
                m.provider == message.provider && m.provider_event_id.as_ref() == Some(event_id)
            });
            if seen {
                return Ok(());
            }
        }
        inner.messages.push(message.clone());
        Ok(())
    }

    async fn insert_tasks(
        &self,
        daily_id: i64,
        _user_id: &str,
        tasks: &[ExtractedTask],
    ) -> Result<(), RitmoError> {
        let mut inner = self.inner.lock().await;
        inner.tasks.insert(daily_id, tasks.to_vec());
        Ok(())
    }

    async fn upsert_reasons(
        &self,
        daily_id: i64,
        reasons: &[ReasonEntry],
    ) -> Result<(), RitmoError> {
        let mut inner = self.inner.lock().await;
        let slot = inner.reasons.entry(daily_id).or_default();
        for reason in reasons {
            match slot.iter_mut().find(|r| r.code == reason.code) {
                Some(existing) if reason.confidence > existing.confidence => {
                    *existing = reason.clone();
                }
                Some(_) => {}
                None => slot.push(reason.clone()),
            }
        }
        Ok(())
    }

    async fn get_first_morning_text(&self, daily_id: i64) -> Result<Option<String>, RitmoError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .messages
            .iter()
            .filter(|m| {
                m.daily_id == Some(daily_id) && m.kind == ritmo_core::MessageKind::Morning
            })
            .min_by_key(|m| m.ts)
            .map(|m| m.text.clone()))
    }

    async fn has_event(&self, provider: &str, event_id: &str) -> Result<bool, RitmoError> {
        let inner = self.inner.lock().await;
        Ok(inner.messages.iter().any(|m| {
            m.provider == provider && m.provider_event_id.as_deref() == Some(event_id)
        }))
    }

    async fn expire_stale_cycles(&self, user_id: &str, date: &str) -> Result<u64, RitmoError> {
        let mut inner = self.inner.lock().await;
        let mut expired = 0;
        for daily in inner.dailies.iter_mut().filter(|d| {
            d.user_id == user_id
                && d.date.as_str() < date
                && matches!(
                    d.state,
                    CycleState::PendingMorning
                        | CycleState::PendingUpdate
                        | CycleState::NeedsFollowup
                )
        }) {
            daily.state = CycleState::Expired;
            expired += 1;
        }
        Ok(expired)
    }
}

fn find_daily<'a>(inner: &'a mut Inner, daily_id: i64) -> Result<&'a mut DailyCycle, RitmoError> {
    inner
        .dailies
        .iter_mut()
        .find(|d| d.id == daily_id)
        .ok_or_else(|| RitmoError::Internal(format!("no daily cycle with id {daily_id}")))
}
