// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotent time-window scheduler.
//!
//! Each tick scans all users, computes their local wall clock, and sends
//! the morning/evening prompts at most once per cycle. All coordination
//! goes through the repository's atomic claim columns, so overlapping
//! ticks (or multiple instances) never double-prompt a user.

use std::sync::Arc;

use tracing::{debug, warn};

use ritmo_config::model::ScheduleConfig;
use ritmo_core::{CycleState, Notifier, Repository, RitmoError, TickOutcome, UserRecord};

use crate::clock;
use crate::texts;

/// Suffix appended to forced debug sends so they are recognizable.
const FORCE_SUFFIX: &str = "\n\n_(debug)_";

/// Cron-driven prompt scheduler. Stateless between ticks.
pub struct WindowScheduler {
    repo: Arc<dyn Repository>,
    notifier: Arc<dyn Notifier>,
    schedule: ScheduleConfig,
    default_tz: String,
}

impl WindowScheduler {
    pub fn new(
        repo: Arc<dyn Repository>,
        notifier: Arc<dyn Notifier>,
        schedule: ScheduleConfig,
        default_tz: String,
    ) -> Self {
        Self {
            repo,
            notifier,
            schedule,
            default_tz,
        }
    }

    /// Run one tick at the given UTC epoch.
    ///
    /// Per-user failures are logged and skipped; one bad user never
    /// stalls the batch. Returns the number of prompts delivered.
    pub async fn tick(&self, now_epoch: i64) -> Result<TickOutcome, RitmoError> {
        if let Some(mode) = self.force_mode() {
            return self.forced_tick(&mode).await;
        }

        let users = self.repo.get_all_users().await?;
        let mut outcome = TickOutcome::default();
        for user in &users {
            if let Err(e) = self.tick_user(user, now_epoch, &mut outcome).await {
                warn!(user_id = %user.user_id, error = %e, "tick failed for user, continuing");
            }
        }
        debug!(morning = outcome.morning, evening = outcome.evening, users = users.len(), "tick complete");
        Ok(outcome)
    }

    async fn tick_user(
        &self,
        user: &UserRecord,
        now_epoch: i64,
        outcome: &mut TickOutcome,
    ) -> Result<(), RitmoError> {
        let tz = clock::parse_tz(&user.tz, &self.default_tz);
        let parts = clock::local_parts(now_epoch, tz);

        self.repo
            .expire_stale_cycles(&user.user_id, &parts.ymd)
            .await?;

        if clock::within_window(
            parts.hour,
            parts.minute,
            self.schedule.morning_hour,
            self.schedule.morning_minute,
            self.schedule.window_minutes,
        ) {
            let daily = self
                .repo
                .get_or_create_daily(&user.user_id, &parts.ymd)
                .await?;
            if daily.state == CycleState::PendingMorning
                && self.repo.claim_morning_prompt(daily.id, parts.epoch).await?
            {
                if self.safe_send(&user.user_id, texts::MORNING).await {
                    outcome.morning += 1;
                }
            }
        }

        if clock::within_window(
            parts.hour,
            parts.minute,
            self.schedule.evening_hour,
            self.schedule.evening_minute,
            self.schedule.window_minutes,
        ) {
            let daily = self.repo.get_daily_by_date(&user.user_id, &parts.ymd).await?;
            // Only remind when a plan was submitted and no update yet.
            if let Some(daily) = daily {
                if daily.state == CycleState::PendingUpdate
                    && self.repo.claim_evening_prompt(daily.id, parts.epoch).await?
                {
                    if self.safe_send(&user.user_id, texts::EVENING).await {
                        outcome.evening += 1;
                    }
                }
            }
        }

        Ok(())
    }

    fn force_mode(&self) -> Option<String> {
        let mode = self.schedule.force_send.as_deref()?.trim().to_lowercase();
        matches!(mode.as_str(), "morning" | "evening" | "both").then_some(mode)
    }

    /// Debug mode: unconditional sends ignoring claims and windows.
    /// Intentionally outside the at-most-once contract.
    async fn forced_tick(&self, mode: &str) -> Result<TickOutcome, RitmoError> {
        let users = self.repo.get_all_users().await?;
        let targets = users
            .iter()
            .filter(|u| match &self.schedule.force_user {
                Some(only) => &u.user_id == only,
                None => true,
            })
            .take(self.schedule.force_limit.unwrap_or(usize::MAX));

        let mut outcome = TickOutcome::default();
        for user in targets {
            if mode == "morning" || mode == "both" {
                let text = format!("{}{}", texts::MORNING, FORCE_SUFFIX);
                if self.safe_send(&user.user_id, &text).await {
                    outcome.morning += 1;
                }
            }
            if mode == "evening" || mode == "both" {
                let text = format!("{}{}", texts::EVENING, FORCE_SUFFIX);
                if self.safe_send(&user.user_id, &text).await {
                    outcome.evening += 1;
                }
            }
        }
        Ok(outcome)
    }

    async fn safe_send(&self, user_id: &str, text: &str) -> bool {
        match self.notifier.send_text(user_id, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id, error = %e, "prompt delivery failed");
                false
            }
        }
    }
}
