// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ritmo serve` and `ritmo tick` wiring.
//!
//! Builds every adapter from configuration and injects them through
//! constructors; nothing here is global.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use ritmo_config::RitmoConfig;
use ritmo_core::{Evaluator, Notifier, ReasonClassifier, Repository, RitmoError, TickOutcome};
use ritmo_deepseek::{DeepseekEvaluator, DeepseekReasonClassifier};
use ritmo_engine::{CycleOrchestrator, WindowScheduler};
use ritmo_gateway::{start_server, GatewayState};
use ritmo_storage::SqliteRepository;
use ritmo_telegram::TelegramNotifier;

/// Stand-in notifier used when no bot token is configured. Delivery is
/// disabled but the engine keeps running, which is what local
/// development against a scratch database wants.
struct DisabledNotifier;

#[async_trait::async_trait]
impl Notifier for DisabledNotifier {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<(), RitmoError> {
        debug!(user_id, len = text.chars().count(), "delivery disabled, dropping message");
        Ok(())
    }

    async fn send_chunks(&self, user_id: &str, text: &str) -> Result<(), RitmoError> {
        self.send_text(user_id, text).await
    }
}

/// The wired engine: orchestrator plus scheduler over shared adapters.
pub struct Engine {
    pub orchestrator: Arc<CycleOrchestrator>,
    pub scheduler: Arc<WindowScheduler>,
}

/// Builds all adapters from config and assembles the engine.
pub async fn build_engine(config: &RitmoConfig) -> Result<Engine, RitmoError> {
    let repo: Arc<dyn Repository> = Arc::new(SqliteRepository::open(&config.storage).await?);
    info!(path = %config.storage.database_path, "storage ready");

    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_config(&config.telegram)? {
        Some(n) => Arc::new(n),
        None => {
            warn!("telegram.bot_token absent, outbound delivery disabled");
            Arc::new(DisabledNotifier)
        }
    };

    let evaluator: Arc<dyn Evaluator> = Arc::new(DeepseekEvaluator::from_config(&config.evaluator)?);
    let classifier: Option<Arc<dyn ReasonClassifier>> =
        DeepseekReasonClassifier::from_config(&config.evaluator)?
            .map(|c| Arc::new(c) as Arc<dyn ReasonClassifier>);

    let orchestrator = Arc::new(CycleOrchestrator::new(
        repo.clone(),
        notifier.clone(),
        evaluator,
        classifier,
        config.agent.baseline_points_per_day,
        config.agent.default_tz.clone(),
    ));
    let scheduler = Arc::new(WindowScheduler::new(
        repo,
        notifier,
        config.schedule.clone(),
        config.agent.default_tz.clone(),
    ));

    Ok(Engine {
        orchestrator,
        scheduler,
    })
}

/// Runs the gateway until the process is stopped.
pub async fn run(config: &RitmoConfig) -> Result<(), RitmoError> {
    let engine = build_engine(config).await?;
    let state = GatewayState {
        orchestrator: engine.orchestrator,
        scheduler: engine.scheduler,
        start_time: Instant::now(),
    };
    start_server(&config.gateway, state).await
}

/// Runs one scheduler pass at the current instant.
pub async fn tick_once(config: &RitmoConfig) -> Result<TickOutcome, RitmoError> {
    let engine = build_engine(config).await?;
    let now = chrono::Utc::now().timestamp();
    engine.scheduler.tick(now).await
}
