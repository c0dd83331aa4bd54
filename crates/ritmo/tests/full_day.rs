// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-day cycle against the real SQLite repository: plan in the
//! morning, evening prompt from the scheduler, scored update, followup
//! close. Exercises the same wiring the binary builds, with delivery and
//! scoring mocked.

use std::sync::Arc;

use ritmo_config::model::{ScheduleConfig, StorageConfig};
use ritmo_core::{CycleState, InboundEvent, Repository};
use ritmo_engine::{CycleOrchestrator, WindowScheduler};
use ritmo_storage::SqliteRepository;
use ritmo_test_utils::{MockEvaluator, MockNotifier};

// 2024-10-04 00:00 UTC.
const DAY: i64 = 20_000 * 86_400;
const DATE: &str = "2024-10-04";

const PLAN: &str = "1. Resolver el algoritmo Two Sum\n2. Revisar el PR de storage\n3. Escribir las pruebas";
const UPDATE: &str = "Avancé poco. Sigo esperando al equipo de QA, bloqueado por la dependencia.";

fn event(id: &str, text: &str, ts: i64) -> InboundEvent {
    InboundEvent {
        provider: "telegram".to_string(),
        event_id: Some(id.to_string()),
        user_id: "u1".to_string(),
        chat_id: "c1".to_string(),
        tz: Some("UTC".to_string()),
        text: text.to_string(),
        ts,
        kind: None,
    }
}

#[tokio::test]
async fn full_day_cycle_reaches_done() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ritmo.db");
    let storage = StorageConfig {
        database_path: db_path.to_string_lossy().into_owned(),
        wal_mode: true,
    };
    let repo = Arc::new(SqliteRepository::open(&storage).await.unwrap());
    let notifier = Arc::new(MockNotifier::new());
    let evaluator = Arc::new(MockEvaluator::with_score(85));

    let orchestrator = CycleOrchestrator::new(
        repo.clone(),
        notifier.clone(),
        evaluator,
        None,
        5,
        "UTC".to_string(),
    );
    let scheduler = WindowScheduler::new(
        repo.clone(),
        notifier.clone(),
        ScheduleConfig::default(),
        "UTC".to_string(),
    );

    // Nobody is registered yet, so the morning tick delivers nothing.
    let outcome = scheduler.tick(DAY + 8 * 3600).await.unwrap();
    assert_eq!((outcome.morning, outcome.evening), (0, 0));

    // The user sends the plan; the engine acks it and extracts tasks.
    orchestrator
        .handle(&event("e1", PLAN, DAY + 7 * 3600 + 50 * 60))
        .await
        .unwrap();
    assert_eq!(notifier.sent_count().await, 1);

    let daily = repo
        .get_daily_by_date("u1", DATE)
        .await
        .unwrap()
        .expect("cycle exists");
    assert_eq!(daily.state, CycleState::PendingUpdate);
    assert!(daily.first_morning_at.is_some());

    let tasks = repo.list_tasks(daily.id).await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks.iter().map(|t| t.pos).collect::<Vec<_>>(), vec![1, 2, 3]);
    let points: i64 = tasks.iter().map(|t| i64::from(t.points)).sum();
    assert_eq!(daily.workload_points, Some(points));

    // Evening window opens; the scheduler prompts exactly once.
    let outcome = scheduler.tick(DAY + 18 * 3600 + 300).await.unwrap();
    assert_eq!((outcome.morning, outcome.evening), (0, 1));
    let outcome = scheduler.tick(DAY + 18 * 3600 + 400).await.unwrap();
    assert_eq!((outcome.morning, outcome.evening), (0, 0));
    assert_eq!(notifier.sent_count().await, 2);

    // Incomplete update: score below 100 labels reasons and asks why.
    orchestrator
        .handle(&event("e2", UPDATE, DAY + 18 * 3600 + 600))
        .await
        .unwrap();
    assert_eq!(notifier.sent_count().await, 3);

    let daily = repo.get_daily_by_date("u1", DATE).await.unwrap().unwrap();
    assert_eq!(daily.state, CycleState::NeedsFollowup);
    assert_eq!(daily.score, Some(85));
    assert!(daily.first_update_at.is_some());

    let reasons = repo.list_reasons(daily.id).await.unwrap();
    assert!(!reasons.is_empty());

    // Replay of the same provider event changes nothing.
    orchestrator
        .handle(&event("e2", UPDATE, DAY + 18 * 3600 + 600))
        .await
        .unwrap();
    assert_eq!(notifier.sent_count().await, 3);
    let daily = repo.get_daily_by_date("u1", DATE).await.unwrap().unwrap();
    assert_eq!(daily.state, CycleState::NeedsFollowup);

    // The followup explanation closes the day.
    orchestrator
        .handle(&event("e3", "Quedé bloqueado esperando la aprobación", DAY + 19 * 3600))
        .await
        .unwrap();
    let daily = repo.get_daily_by_date("u1", DATE).await.unwrap().unwrap();
    assert_eq!(daily.state, CycleState::Done);
    assert!(daily.closed_at.is_some());
}
