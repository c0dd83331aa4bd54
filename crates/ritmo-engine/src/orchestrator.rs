// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user daily-cycle state machine.
//!
//! States move `pending_morning -> pending_update -> {done | needs_followup}
//! -> done`, with a global escape to `expired` when a new logical day
//! begins before completion. Out-of-order messages degrade to free chat
//! and never mutate state.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use ritmo_core::{
    CycleState, DailyCycle, DailyPatch, Evaluator, InboundEvent, MessageKind, MessageRecord,
    Notifier, ReasonClassifier, ReasonEntry, ReasonSource, Repository, RitmoError, UserRecord,
};

use crate::clock;
use crate::reasons::{ReasonTagger, HEURISTIC_VERSION};
use crate::texts;
use crate::workload::{classify_workload, extract_tasks};

/// Heuristic confidence below which the LLM classifier is consulted.
const ESCALATION_THRESHOLD: f64 = 0.6;
/// Top-two confidence gap below which the labeling counts as ambiguous.
const AMBIGUITY_MARGIN: f64 = 0.05;
/// Fixed confidence recorded for LLM-produced labels.
const LLM_CONFIDENCE: f64 = 0.9;
/// Raw evidence stored with heuristic labels is capped at this many chars.
const RAW_EVIDENCE_MAX: usize = 300;

/// Drives one user's daily ritual from inbound events.
pub struct CycleOrchestrator {
    repo: Arc<dyn Repository>,
    notifier: Arc<dyn Notifier>,
    evaluator: Arc<dyn Evaluator>,
    classifier: Option<Arc<dyn ReasonClassifier>>,
    tagger: ReasonTagger,
    baseline_points_per_day: u32,
    default_tz: String,
}

impl CycleOrchestrator {
    pub fn new(
        repo: Arc<dyn Repository>,
        notifier: Arc<dyn Notifier>,
        evaluator: Arc<dyn Evaluator>,
        classifier: Option<Arc<dyn ReasonClassifier>>,
        baseline_points_per_day: u32,
        default_tz: String,
    ) -> Self {
        Self {
            repo,
            notifier,
            evaluator,
            classifier,
            tagger: ReasonTagger::default(),
            baseline_points_per_day,
            default_tz,
        }
    }

    /// Process one normalized inbound event.
    ///
    /// Replays of an already-recorded `provider_event_id` are a no-op.
    /// Every accepted message is persisted before any state transition,
    /// at most one outbound send results from one inbound event, and the
    /// transition commits before the send so a delivery failure never
    /// strands the cycle.
    pub async fn handle(&self, event: &InboundEvent) -> Result<(), RitmoError> {
        if let Some(event_id) = &event.event_id {
            if self.repo.has_event(&event.provider, event_id).await? {
                debug!(provider = %event.provider, event_id, "duplicate event, skipping");
                return Ok(());
            }
        }

        let tz_name = event.tz.as_deref().unwrap_or(&self.default_tz);
        let tz = clock::parse_tz(tz_name, &self.default_tz);
        let ymd = clock::local_date(event.ts, tz);

        self.repo
            .upsert_user(&UserRecord {
                user_id: event.user_id.clone(),
                chat_id: event.chat_id.clone(),
                tz: tz_name.to_string(),
                provider: event.provider.clone(),
            })
            .await?;
        self.repo.expire_stale_cycles(&event.user_id, &ymd).await?;

        let daily = self.repo.get_or_create_daily(&event.user_id, &ymd).await?;
        let kind = effective_kind(daily.state, event.kind);

        self.repo
            .insert_message(&MessageRecord {
                daily_id: Some(daily.id),
                user_id: event.user_id.clone(),
                chat_id: event.chat_id.clone(),
                provider: event.provider.clone(),
                provider_message_id: None,
                provider_event_id: event.event_id.clone(),
                text: event.text.clone(),
                ts: event.ts,
                kind,
            })
            .await?;

        match kind {
            MessageKind::Morning => self.on_morning(&daily, event).await,
            MessageKind::Update => self.on_update(&daily, event).await,
            MessageKind::Followup => self.on_followup(&daily).await,
            MessageKind::Chat | MessageKind::System => Ok(()),
        }
    }

    /// Onboarding: (re)open today's cycle and send the morning prompt.
    pub async fn start_cycle(
        &self,
        user_id: &str,
        chat_id: &str,
        ymd: &str,
        ts: i64,
        provider: &str,
    ) -> Result<(), RitmoError> {
        let daily = self
            .repo
            .create_daily(user_id, ymd, CycleState::PendingMorning)
            .await?;
        if daily.state != CycleState::PendingMorning {
            self.repo
                .set_daily_state(daily.id, CycleState::PendingMorning)
                .await?;
        }
        self.deliver(daily.id, user_id, chat_id, provider, texts::MORNING, ts)
            .await?;
        info!(user_id, ymd, "cycle started");
        Ok(())
    }

    /// Handle a slash command. `/start` (re)opens today's cycle; unknown
    /// commands are archived and ignored. Replays dedupe like `handle`.
    pub async fn handle_command(
        &self,
        event: &InboundEvent,
        command: &str,
    ) -> Result<(), RitmoError> {
        if let Some(event_id) = &event.event_id {
            if self.repo.has_event(&event.provider, event_id).await? {
                debug!(provider = %event.provider, event_id, "duplicate command, skipping");
                return Ok(());
            }
        }

        let tz_name = event.tz.as_deref().unwrap_or(&self.default_tz);
        let tz = clock::parse_tz(tz_name, &self.default_tz);
        let ymd = clock::local_date(event.ts, tz);

        self.repo
            .upsert_user(&UserRecord {
                user_id: event.user_id.clone(),
                chat_id: event.chat_id.clone(),
                tz: tz_name.to_string(),
                provider: event.provider.clone(),
            })
            .await?;
        self.repo
            .insert_message(&MessageRecord {
                daily_id: None,
                user_id: event.user_id.clone(),
                chat_id: event.chat_id.clone(),
                provider: event.provider.clone(),
                provider_message_id: None,
                provider_event_id: event.event_id.clone(),
                text: event.text.clone(),
                ts: event.ts,
                kind: MessageKind::Chat,
            })
            .await?;

        match command.trim() {
            "/start" => {
                self.start_cycle(
                    &event.user_id,
                    &event.chat_id,
                    &ymd,
                    event.ts,
                    &event.provider,
                )
                .await
            }
            other => {
                debug!(user_id = %event.user_id, command = other, "unknown command ignored");
                Ok(())
            }
        }
    }

    async fn on_morning(&self, daily: &DailyCycle, event: &InboundEvent) -> Result<(), RitmoError> {
        self.repo
            .patch_daily(daily.id, &DailyPatch::new().with_first_morning_at(event.ts))
            .await?;

        let tasks = extract_tasks(&event.text);
        if !tasks.is_empty() {
            self.repo
                .insert_tasks(daily.id, &event.user_id, &tasks)
                .await?;
            let total: u32 = tasks.iter().map(|t| t.points).sum();
            let level = classify_workload(total, self.baseline_points_per_day);
            self.repo
                .patch_daily(daily.id, &DailyPatch::new().with_workload(total.into(), level))
                .await?;
            debug!(user_id = %event.user_id, tasks = tasks.len(), points = total, ?level, "plan extracted");
        }

        self.repo
            .set_daily_state(daily.id, CycleState::PendingUpdate)
            .await?;
        self.deliver(
            daily.id,
            &event.user_id,
            &event.chat_id,
            &event.provider,
            texts::ACK_MORNING,
            now_epoch(),
        )
        .await
    }

    async fn on_update(&self, daily: &DailyCycle, event: &InboundEvent) -> Result<(), RitmoError> {
        self.repo
            .patch_daily(daily.id, &DailyPatch::new().with_first_update_at(event.ts))
            .await?;

        let plan = self.repo.get_first_morning_text(daily.id).await?;
        let evaluation = self
            .evaluator
            .evaluate(plan.as_deref().unwrap_or(""), &event.text)
            .await;
        let score = evaluation.score.min(100);
        info!(user_id = %event.user_id, score, model = %evaluation.model, "update evaluated");

        self.repo
            .patch_daily(
                daily.id,
                &DailyPatch::new()
                    .with_score(score)
                    .with_eval_model(&evaluation.model)
                    .with_eval_rubric(&evaluation.rubric_version)
                    .with_eval_rationale(&evaluation.rationale),
            )
            .await?;

        if score < 100 {
            self.label_reasons(daily.id, plan.as_deref(), event).await?;
            self.repo
                .set_daily_state(daily.id, CycleState::NeedsFollowup)
                .await?;
            self.deliver(
                daily.id,
                &event.user_id,
                &event.chat_id,
                &event.provider,
                texts::FOLLOWUP,
                now_epoch(),
            )
            .await?;
        } else {
            self.repo
                .patch_daily(daily.id, &DailyPatch::new().with_closed_at(now_epoch()))
                .await?;
            self.repo.set_daily_state(daily.id, CycleState::Done).await?;
            let congrats = format!("{}{}", texts::CONGRATS_PREFIX, evaluation.advice);
            self.deliver(
                daily.id,
                &event.user_id,
                &event.chat_id,
                &event.provider,
                &congrats,
                now_epoch(),
            )
            .await?;
        }
        Ok(())
    }

    /// The explanation itself was already persisted by `handle`; the
    /// followup closes the cycle. Coaching replies are a notifier-side
    /// concern and not produced here.
    async fn on_followup(&self, daily: &DailyCycle) -> Result<(), RitmoError> {
        self.repo
            .patch_daily(daily.id, &DailyPatch::new().with_closed_at(now_epoch()))
            .await?;
        self.repo.set_daily_state(daily.id, CycleState::Done).await?;
        Ok(())
    }

    /// Heuristic labels first; escalate to the single-label LLM
    /// classifier when the tagger is empty, weak, or ambiguous.
    async fn label_reasons(
        &self,
        daily_id: i64,
        plan: Option<&str>,
        event: &InboundEvent,
    ) -> Result<(), RitmoError> {
        let tags = self.tagger.tag(&event.text);
        if !tags.is_empty() {
            let raw: String = event.text.chars().take(RAW_EVIDENCE_MAX).collect();
            let entries: Vec<ReasonEntry> = tags
                .iter()
                .map(|t| ReasonEntry {
                    code: t.code,
                    confidence: t.confidence,
                    source: ReasonSource::Heuristic,
                    raw: Some(raw.clone()),
                    message_id: event.event_id.clone(),
                    model_version: Some(HEURISTIC_VERSION.to_string()),
                })
                .collect();
            self.repo.upsert_reasons(daily_id, &entries).await?;
        }

        let needs_llm = tags.is_empty()
            || tags[0].confidence < ESCALATION_THRESHOLD
            || is_ambiguous(&tags);
        if !needs_llm {
            return Ok(());
        }
        let Some(classifier) = &self.classifier else {
            return Ok(());
        };

        let code = classifier.classify(plan, &event.text).await;
        debug!(daily_id, %code, "reason escalated to llm classifier");
        self.repo
            .upsert_reasons(
                daily_id,
                &[ReasonEntry {
                    code,
                    confidence: LLM_CONFIDENCE,
                    source: ReasonSource::Llm,
                    raw: None,
                    message_id: event.event_id.clone(),
                    model_version: Some(classifier.model_version()),
                }],
            )
            .await
    }

    /// Outbound delivery runs after the state transition is committed. A
    /// channel failure is logged and swallowed so the cycle keeps moving;
    /// repository errors from archiving the sent text still propagate.
    async fn deliver(
        &self,
        daily_id: i64,
        user_id: &str,
        chat_id: &str,
        provider: &str,
        text: &str,
        ts: i64,
    ) -> Result<(), RitmoError> {
        match self.notifier.send_text(user_id, text).await {
            Ok(()) => {
                self.record_outbound(daily_id, user_id, chat_id, provider, text, ts)
                    .await
            }
            Err(RitmoError::Notify { message, .. }) => {
                warn!(user_id, error = %message, "outbound delivery failed, cycle already advanced");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn record_outbound(
        &self,
        daily_id: i64,
        user_id: &str,
        chat_id: &str,
        provider: &str,
        text: &str,
        ts: i64,
    ) -> Result<(), RitmoError> {
        self.repo
            .insert_message(&MessageRecord {
                daily_id: Some(daily_id),
                user_id: user_id.to_string(),
                chat_id: chat_id.to_string(),
                provider: provider.to_string(),
                provider_message_id: None,
                provider_event_id: None,
                text: text.to_string(),
                ts,
                kind: MessageKind::System,
            })
            .await
    }
}

/// A provided kind is honored only when the cycle state admits it;
/// anything else degrades to free chat.
fn effective_kind(state: CycleState, requested: Option<MessageKind>) -> MessageKind {
    let derived = MessageKind::classify(state);
    match requested {
        None => derived,
        Some(kind) if kind == derived || kind == MessageKind::Chat => kind,
        Some(_) => MessageKind::Chat,
    }
}

fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

fn is_ambiguous(tags: &[crate::reasons::TaggedReason]) -> bool {
    match tags {
        [first, second, ..] => (first.confidence - second.confidence) < AMBIGUITY_MARGIN,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritmo_core::ReasonCode;
    use ritmo_test_utils::{MemoryRepository, MockClassifier, MockEvaluator, MockNotifier};

    struct Fixture {
        repo: Arc<MemoryRepository>,
        notifier: Arc<MockNotifier>,
        evaluator: Arc<MockEvaluator>,
        classifier: Arc<MockClassifier>,
        orchestrator: CycleOrchestrator,
    }

    fn fixture(default_score: u8) -> Fixture {
        let repo = Arc::new(MemoryRepository::new());
        let notifier = Arc::new(MockNotifier::new());
        let evaluator = Arc::new(MockEvaluator::with_score(default_score));
        let classifier = Arc::new(MockClassifier::answering(ReasonCode::ScopeChange));
        let orchestrator = CycleOrchestrator::new(
            repo.clone(),
            notifier.clone(),
            evaluator.clone(),
            Some(classifier.clone()),
            5,
            "America/Bogota".to_string(),
        );
        Fixture {
            repo,
            notifier,
            evaluator,
            classifier,
            orchestrator,
        }
    }

    fn event(text: &str, event_id: &str, ts: i64) -> InboundEvent {
        InboundEvent {
            provider: "telegram".to_string(),
            event_id: Some(event_id.to_string()),
            user_id: "u1".to_string(),
            chat_id: "c1".to_string(),
            tz: Some("UTC".to_string()),
            text: text.to_string(),
            ts,
            kind: None,
        }
    }

    // 2026-08-27 09:00:00 UTC.
    const MORNING_TS: i64 = 1_787_821_200;
    const EVENING_TS: i64 = MORNING_TS + 9 * 3600;

    const PLAN: &str = "1. Resolver el algoritmo Two Sum\n2. Migrar el esquema de storage";

    #[tokio::test]
    async fn morning_plan_extracts_tasks_and_advances() {
        let f = fixture(100);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::PendingUpdate);
        assert_eq!(daily.first_morning_at, Some(MORNING_TS));
        assert!(daily.workload_points.is_some());

        let tasks = f.repo.tasks(daily.id).await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].pos, 1);

        let sent = f.notifier.sent_to("u1").await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], texts::ACK_MORNING);
    }

    #[tokio::test]
    async fn complete_update_closes_the_cycle() {
        let f = fixture(100);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.orchestrator
            .handle(&event("Hice todo lo planeado", "e2", EVENING_TS))
            .await
            .unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::Done);
        assert_eq!(daily.score, Some(100));
        assert!(daily.closed_at.is_some());

        let sent = f.notifier.sent_to("u1").await;
        assert_eq!(sent.len(), 2);
        assert!(sent[1].starts_with(texts::CONGRATS_PREFIX));
    }

    #[tokio::test]
    async fn incomplete_update_requests_followup_and_labels_reasons() {
        let f = fixture(70);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.orchestrator
            .handle(&event(
                "Quedé bloqueado esperando accesos al ambiente",
                "e2",
                EVENING_TS,
            ))
            .await
            .unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::NeedsFollowup);
        assert_eq!(daily.score, Some(70));
        assert!(daily.closed_at.is_none());

        let reasons = f.repo.reasons(daily.id).await;
        assert!(reasons.iter().any(|r| r.code == ReasonCode::Impediment
            && r.source == ReasonSource::Heuristic));

        let sent = f.notifier.sent_to("u1").await;
        assert_eq!(sent[1], texts::FOLLOWUP);

        // The followup explanation closes the cycle without a new send.
        f.orchestrator
            .handle(&event("Era el ambiente de QA", "e3", EVENING_TS + 600))
            .await
            .unwrap();
        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::Done);
        assert!(daily.closed_at.is_some());
        assert_eq!(f.notifier.sent_to("u1").await.len(), 2);
    }

    #[tokio::test]
    async fn vague_update_escalates_to_llm_classifier() {
        let f = fixture(70);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.orchestrator
            .handle(&event("hoy salieron otras cositas", "e2", EVENING_TS))
            .await
            .unwrap();

        assert_eq!(f.classifier.call_count().await, 1);
        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        let reasons = f.repo.reasons(daily.id).await;
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].code, ReasonCode::ScopeChange);
        assert_eq!(reasons[0].confidence, 0.9);
        assert_eq!(reasons[0].source, ReasonSource::Llm);
    }

    #[tokio::test]
    async fn confident_heuristic_skips_llm() {
        let f = fixture(70);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.orchestrator
            .handle(&event(
                "Quedé bloqueado esperando accesos, sin respuesta del proveedor",
                "e2",
                EVENING_TS,
            ))
            .await
            .unwrap();
        assert_eq!(f.classifier.call_count().await, 0);
    }

    #[tokio::test]
    async fn replayed_event_is_a_no_op() {
        let f = fixture(100);
        let e = event(PLAN, "e1", MORNING_TS);
        f.orchestrator.handle(&e).await.unwrap();
        f.orchestrator.handle(&e).await.unwrap();

        assert_eq!(f.notifier.sent_count().await, 1);
        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::PendingUpdate);
    }

    #[tokio::test]
    async fn message_in_done_state_is_chat() {
        let f = fixture(100);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.orchestrator
            .handle(&event("Todo listo", "e2", EVENING_TS))
            .await
            .unwrap();
        f.orchestrator
            .handle(&event("gracias!", "e3", EVENING_TS + 60))
            .await
            .unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::Done);
        // No extra send for chat.
        assert_eq!(f.notifier.sent_count().await, 2);
    }

    #[tokio::test]
    async fn forced_kind_against_state_degrades_to_chat() {
        let f = fixture(100);
        let mut e = event("esto no es un update", "e1", MORNING_TS);
        e.kind = Some(MessageKind::Update);
        f.orchestrator.handle(&e).await.unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        // Still waiting for the plan; the message was archived as chat.
        assert_eq!(daily.state, CycleState::PendingMorning);
        assert_eq!(daily.score, None);
        assert_eq!(f.notifier.sent_count().await, 0);
    }

    #[tokio::test]
    async fn new_day_expires_the_old_cycle() {
        let f = fixture(100);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.orchestrator
            .handle(&event(PLAN, "e2", MORNING_TS + 86_400))
            .await
            .unwrap();

        let old = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(old.state, CycleState::Expired);
        let fresh = f
            .repo
            .get_daily_by_date("u1", "2026-08-28")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fresh.state, CycleState::PendingUpdate);
    }

    #[tokio::test]
    async fn failed_delivery_still_advances_state() {
        let f = fixture(100);
        f.notifier.fail_for("u1").await;
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::PendingUpdate);
        assert_eq!(f.notifier.sent_count().await, 0);

        // A channel retry of the same event dedupes and must not regress.
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::PendingUpdate);

        // The evening update is still acted on despite the lost ack.
        f.orchestrator
            .handle(&event("Hice todo lo planeado", "e2", EVENING_TS))
            .await
            .unwrap();
        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::Done);
    }

    #[tokio::test]
    async fn failed_followup_delivery_still_requests_followup() {
        let f = fixture(70);
        f.orchestrator.handle(&event(PLAN, "e1", MORNING_TS)).await.unwrap();
        f.notifier.fail_for("u1").await;
        f.orchestrator
            .handle(&event("Quedé bloqueado todo el día", "e2", EVENING_TS))
            .await
            .unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::NeedsFollowup);
        assert_eq!(daily.score, Some(70));
    }

    #[tokio::test]
    async fn start_command_opens_the_cycle() {
        let f = fixture(100);
        f.orchestrator
            .handle_command(&event("/start", "cmd1", MORNING_TS), "/start")
            .await
            .unwrap();

        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::PendingMorning);
        assert_eq!(f.notifier.sent_to("u1").await, vec![texts::MORNING.to_string()]);

        // Replays of the same command id are deduped.
        f.orchestrator
            .handle_command(&event("/start", "cmd1", MORNING_TS), "/start")
            .await
            .unwrap();
        assert_eq!(f.notifier.sent_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_command_is_ignored() {
        let f = fixture(100);
        f.orchestrator
            .handle_command(&event("/help", "cmd2", MORNING_TS), "/help")
            .await
            .unwrap();

        assert_eq!(f.notifier.sent_count().await, 0);
        let daily = f.repo.get_daily_by_date("u1", "2026-08-27").await.unwrap();
        assert!(daily.is_none());
    }

    #[tokio::test]
    async fn start_cycle_sends_morning_prompt() {
        let f = fixture(100);
        f.orchestrator
            .start_cycle("u1", "c1", "2026-08-27", MORNING_TS, "telegram")
            .await
            .unwrap();

        let sent = f.notifier.sent_to("u1").await;
        assert_eq!(sent, vec![texts::MORNING.to_string()]);
        let daily = f
            .repo
            .get_daily_by_date("u1", "2026-08-27")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(daily.state, CycleState::PendingMorning);
    }
}
