// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across ports and the Ritmo engine.
//!
//! All enums carry stable snake_case string forms (via strum) because the
//! same strings live in the SQLite schema and in remote-classifier prompts.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifies the type of adapter behind a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Repository,
    Notifier,
    Evaluator,
    Classifier,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// State of a user's daily cycle.
///
/// Valid transitions: `PendingMorning -> PendingUpdate -> {Done | NeedsFollowup}`
/// and `NeedsFollowup -> Done`. Any unfinished cycle escapes to `Expired`
/// when a new logical day begins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    PendingMorning,
    PendingUpdate,
    NeedsFollowup,
    Done,
    Expired,
}

/// Role of a message within a daily cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Morning,
    Update,
    Followup,
    Chat,
    System,
}

impl MessageKind {
    /// Classifies an inbound user message by the current cycle state:
    /// a message in `PendingMorning` is the plan, in `PendingUpdate` the
    /// day's report, in `NeedsFollowup` the explanation, otherwise free chat.
    pub fn classify(state: CycleState) -> Self {
        match state {
            CycleState::PendingMorning => MessageKind::Morning,
            CycleState::PendingUpdate => MessageKind::Update,
            CycleState::NeedsFollowup => MessageKind::Followup,
            CycleState::Done | CycleState::Expired => MessageKind::Chat,
        }
    }
}

/// Estimated size of a single planned task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Complexity {
    #[strum(serialize = "XS")]
    #[serde(rename = "XS")]
    Xs,
    S,
    M,
    L,
    #[strum(serialize = "XL")]
    #[serde(rename = "XL")]
    Xl,
}

impl Complexity {
    /// Fixed story-point mapping: XS=1, S=2, M=3, L=5, XL=8.
    pub fn points(self) -> u32 {
        match self {
            Complexity::Xs => 1,
            Complexity::S => 2,
            Complexity::M => 3,
            Complexity::L => 5,
            Complexity::Xl => 8,
        }
    }
}

/// Classification of a day's estimated task points against a baseline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Low,
    Normal,
    High,
}

/// Closed set of reasons why a plan was not completed.
///
/// `Other` exists only for the LLM escalation path, which must always
/// answer with something from the closed set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Impediment,
    BlockedDependency,
    ScopeChange,
    Overcommitment,
    UnknownTech,
    TechDebt,
    RequirementsClarity,
    ToolingIssues,
    MajorIncident,
    MeetingsOverload,
    HealthIssue,
    PersonalEmergency,
    Other,
}

/// Where a persisted reason came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReasonSource {
    Heuristic,
    Llm,
    Manual,
}

/// Where an extracted task came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    Heuristic,
    Llm,
}

/// A user known to the engine. Created on first contact, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    /// Delivery target for the notifier.
    pub chat_id: String,
    /// IANA timezone name, e.g. "America/Bogota".
    pub tz: String,
    pub provider: String,
}

/// One user's daily cycle: the central entity of the engine.
///
/// At most one cycle exists per (user_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCycle {
    pub id: i64,
    pub user_id: String,
    /// Logical calendar day in the user's timezone, YYYY-MM-DD.
    pub date: String,
    pub state: CycleState,
    pub score: Option<u8>,
    pub eval_model: Option<String>,
    pub eval_rubric: Option<String>,
    pub eval_rationale: Option<String>,
    /// Prompt claim timestamps, each set at most once (epoch seconds).
    pub morning_prompt_at: Option<i64>,
    pub evening_prompt_at: Option<i64>,
    pub first_morning_at: Option<i64>,
    pub first_update_at: Option<i64>,
    pub closed_at: Option<i64>,
    pub workload_points: Option<i64>,
    pub workload_level: Option<WorkloadLevel>,
}

/// An immutable message row, inbound or outbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub daily_id: Option<i64>,
    pub user_id: String,
    pub chat_id: String,
    pub provider: String,
    /// Channel-assigned message id, when known.
    pub provider_message_id: Option<String>,
    /// Channel-assigned delivery event id, used for idempotent dedup.
    pub provider_event_id: Option<String>,
    pub text: String,
    /// Epoch seconds.
    pub ts: i64,
    pub kind: MessageKind,
}

/// A task extracted from a morning plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    /// 1-based order within the cycle.
    pub pos: u32,
    pub text: String,
    pub complexity: Complexity,
    pub points: u32,
    pub source: TaskSource,
}

/// A (cycle, code) reason pair ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonEntry {
    pub code: ReasonCode,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub source: ReasonSource,
    /// Raw evidence text, truncated by the caller.
    pub raw: Option<String>,
    /// Originating message id, when known.
    pub message_id: Option<String>,
    pub model_version: Option<String>,
}

/// Result of scoring an evening update against a morning plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Completion score, 0..=100.
    pub score: u8,
    pub rationale: String,
    pub advice: String,
    pub model: String,
    pub rubric_version: String,
}

/// A normalized inbound event handed to the orchestrator.
///
/// `kind` is optional: when absent, the orchestrator classifies the
/// message from the current cycle state via [`MessageKind::classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub provider: String,
    pub event_id: Option<String>,
    pub user_id: String,
    pub chat_id: String,
    /// IANA timezone hint from the channel adapter, if any.
    pub tz: Option<String>,
    pub text: String,
    /// Epoch seconds.
    pub ts: i64,
    pub kind: Option<MessageKind>,
}

/// Fields of a daily cycle that may be patched after creation.
///
/// Unset fields are left untouched by the repository. Built with the
/// `with_*` setters so call sites never juggle bare `Option`s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyPatch {
    pub first_morning_at: Option<i64>,
    pub first_update_at: Option<i64>,
    pub closed_at: Option<i64>,
    pub score: Option<u8>,
    pub eval_model: Option<String>,
    pub eval_rubric: Option<String>,
    pub eval_rationale: Option<String>,
    pub workload_points: Option<i64>,
    pub workload_level: Option<WorkloadLevel>,
}

impl DailyPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_first_morning_at(mut self, ts: i64) -> Self {
        self.first_morning_at = Some(ts);
        self
    }

    pub fn with_first_update_at(mut self, ts: i64) -> Self {
        self.first_update_at = Some(ts);
        self
    }

    pub fn with_closed_at(mut self, ts: i64) -> Self {
        self.closed_at = Some(ts);
        self
    }

    pub fn with_score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_eval_model(mut self, model: impl Into<String>) -> Self {
        self.eval_model = Some(model.into());
        self
    }

    pub fn with_eval_rubric(mut self, rubric: impl Into<String>) -> Self {
        self.eval_rubric = Some(rubric.into());
        self
    }

    pub fn with_eval_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.eval_rationale = Some(rationale.into());
        self
    }

    pub fn with_workload(mut self, points: i64, level: WorkloadLevel) -> Self {
        self.workload_points = Some(points);
        self.workload_level = Some(level);
        self
    }
}

/// Counts returned by one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub morning: u64,
    pub evening: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cycle_state_round_trips_through_strings() {
        let states = [
            CycleState::PendingMorning,
            CycleState::PendingUpdate,
            CycleState::NeedsFollowup,
            CycleState::Done,
            CycleState::Expired,
        ];
        for state in states {
            let s = state.to_string();
            assert_eq!(CycleState::from_str(&s).unwrap(), state);
        }
        assert_eq!(CycleState::PendingMorning.to_string(), "pending_morning");
        assert_eq!(CycleState::NeedsFollowup.to_string(), "needs_followup");
    }

    #[test]
    fn message_kind_classification_follows_cycle_state() {
        assert_eq!(
            MessageKind::classify(CycleState::PendingMorning),
            MessageKind::Morning
        );
        assert_eq!(
            MessageKind::classify(CycleState::PendingUpdate),
            MessageKind::Update
        );
        assert_eq!(
            MessageKind::classify(CycleState::NeedsFollowup),
            MessageKind::Followup
        );
        assert_eq!(MessageKind::classify(CycleState::Done), MessageKind::Chat);
        assert_eq!(
            MessageKind::classify(CycleState::Expired),
            MessageKind::Chat
        );
    }

    #[test]
    fn complexity_points_mapping_is_fixed() {
        assert_eq!(Complexity::Xs.points(), 1);
        assert_eq!(Complexity::S.points(), 2);
        assert_eq!(Complexity::M.points(), 3);
        assert_eq!(Complexity::L.points(), 5);
        assert_eq!(Complexity::Xl.points(), 8);
        assert_eq!(Complexity::Xs.to_string(), "XS");
        assert_eq!(Complexity::Xl.to_string(), "XL");
    }

    #[test]
    fn reason_code_string_forms_are_snake_case() {
        assert_eq!(ReasonCode::BlockedDependency.to_string(), "blocked_dependency");
        assert_eq!(
            ReasonCode::from_str("meetings_overload").unwrap(),
            ReasonCode::MeetingsOverload
        );
        assert!(ReasonCode::from_str("not_a_code").is_err());
    }

    #[test]
    fn daily_patch_builder_sets_only_requested_fields() {
        let patch = DailyPatch::new()
            .with_score(80)
            .with_eval_model("deepseek-chat");
        assert_eq!(patch.score, Some(80));
        assert_eq!(patch.eval_model.as_deref(), Some("deepseek-chat"));
        assert!(patch.first_morning_at.is_none());
        assert!(!patch.is_empty());
        assert!(DailyPatch::new().is_empty());
    }

    #[test]
    fn inbound_event_serializes_with_snake_case_kind() {
        let event = InboundEvent {
            provider: "telegram".into(),
            event_id: Some("evt-1".into()),
            user_id: "u1".into(),
            chat_id: "c1".into(),
            tz: None,
            text: "hola".into(),
            ts: 1_700_000_000,
            kind: Some(MessageKind::Morning),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"morning\""), "got: {json}");
        let parsed: InboundEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
