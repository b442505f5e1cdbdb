use std::sync::Arc;

use chrono::Duration;
use course_core::time::fixed_now;
use services::{
    AppServices, Clock, ModulePercentPolicy, ProgressPolicy, ProgressService, UnlockPolicy,
    builtin_catalog,
};
use storage::{InMemoryProgressStore, PROGRESS_KEY, ProgressStore, decode_progress};

async fn load_with(store: &InMemoryProgressStore, clock: Clock) -> ProgressService {
    ProgressService::load(
        Arc::new(builtin_catalog().unwrap()),
        Arc::new(store.clone()),
        clock,
        ProgressPolicy::default(),
    )
    .await
}

#[tokio::test]
async fn first_launch_credits_streak_and_persists() {
    let store = InMemoryProgressStore::new();
    let service = load_with(&store, Clock::fixed(fixed_now())).await;

    assert_eq!(service.progress().xp, 10);
    assert_eq!(service.progress().streak.current, 1);
    assert_eq!(service.overall_percent(), 0);
    assert_eq!(service.level().level, 1);

    let raw = store.load_blob(PROGRESS_KEY).await.unwrap().unwrap();
    assert_eq!(&decode_progress(&raw).unwrap(), service.progress());
}

#[tokio::test]
async fn unreadable_or_foreign_records_start_fresh() {
    for raw in ["{not json", r#"{"version": 7, "xp": 900}"#, r#"{"xp": 900}"#] {
        let store = InMemoryProgressStore::with_blob(PROGRESS_KEY, raw);
        let service = load_with(&store, Clock::fixed(fixed_now())).await;
        assert_eq!(service.progress().xp, 10, "input: {raw}");
        assert!(service.progress().modules.is_empty());

        let rewritten = store.load_blob(PROGRESS_KEY).await.unwrap().unwrap();
        assert!(decode_progress(&rewritten).is_ok());
    }
}

#[tokio::test]
async fn mutations_survive_a_reload() {
    let store = InMemoryProgressStore::new();
    let clock = Clock::fixed(fixed_now());
    let mut service = load_with(&store, clock).await;

    let read = service
        .mark_section_read("module-1", "section-1-1")
        .await
        .unwrap();
    assert_eq!(read.xp_gained, 5);
    let answer = service.submit_quiz_answer("module-1", "q1-1", "b").await;
    assert!(answer.correct);
    assert_eq!(answer.recorded.unwrap().xp_gained, 15);

    let reloaded = load_with(&store, clock).await;
    assert_eq!(reloaded.progress(), service.progress());
    assert_eq!(reloaded.progress().xp, 30);
    assert_eq!(reloaded.module_percent("module-1"), 20);
}

#[tokio::test]
async fn streak_follows_calendar_days_between_launches() {
    let store = InMemoryProgressStore::new();
    let mut clock = Clock::fixed(fixed_now());

    let first = load_with(&store, clock).await;
    assert_eq!(first.progress().streak.current, 1);

    let same_day = load_with(&store, clock).await;
    assert_eq!(same_day.progress(), first.progress());

    clock.advance(Duration::days(1));
    let second = load_with(&store, clock).await;
    assert_eq!(second.progress().streak.current, 2);

    clock.advance(Duration::days(1));
    let third = load_with(&store, clock).await;
    assert_eq!(third.progress().streak.current, 3);
    assert!(third.has_badge("streak-3"));
    assert_eq!(third.progress().xp, 30);

    clock.advance(Duration::days(3));
    let after_gap = load_with(&store, clock).await;
    assert_eq!(after_gap.progress().streak.current, 1);
    assert_eq!(after_gap.progress().streak.longest, 3);
    assert!(after_gap.has_badge("streak-3"));
}

#[tokio::test]
async fn reset_clears_progress_and_recredits_today() {
    let store = InMemoryProgressStore::new();
    let clock = Clock::fixed(fixed_now());
    let mut service = load_with(&store, clock).await;
    for i in 1..=5 {
        service
            .mark_section_read("module-1", &format!("section-1-{i}"))
            .await;
    }
    assert!(service.has_badge("first-delegate"));

    service.reset_progress().await;
    assert_eq!(service.progress().xp, 10);
    assert_eq!(service.progress().streak.current, 1);
    assert!(service.progress().badges.is_empty());
    assert!(!service.is_module_complete("module-1"));

    let reloaded = load_with(&store, clock).await;
    assert_eq!(reloaded.progress(), service.progress());
}

#[tokio::test]
async fn sequential_unlock_waits_for_previous_quiz() {
    let store = InMemoryProgressStore::new();
    let policy = ProgressPolicy {
        unlock: UnlockPolicy::SequentialQuiz,
        module_percent: ModulePercentPolicy::BLENDED_70_30,
    };
    let mut service = ProgressService::load(
        Arc::new(builtin_catalog().unwrap()),
        Arc::new(store),
        Clock::fixed(fixed_now()),
        policy,
    )
    .await;

    assert!(service.is_module_unlocked("module-1"));
    assert!(!service.is_module_unlocked("module-2"));

    for (q, answer) in [("q1-1", "b"), ("q1-2", "c"), ("q1-3", "b")] {
        service.submit_quiz_answer("module-1", q, answer).await;
    }
    assert!(service.is_module_unlocked("module-2"));
    assert!(!service.is_module_unlocked("module-3"));
    assert_eq!(service.module_percent("module-1"), 30);
    assert!(service.has_badge("perfect-quiz"));
}

#[tokio::test]
async fn full_course_run_over_sqlite() {
    let app = AppServices::new_sqlite(
        "sqlite:file:memdb_course_full_run?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        ProgressPolicy::default(),
    )
    .await
    .expect("services");
    let mut service = app.progress_service().await;
    let catalog = app.catalog();

    for def in catalog.modules() {
        for question in def.quiz() {
            let answer = service
                .submit_quiz_answer(
                    def.id().as_str(),
                    question.id().as_str(),
                    question.correct_answer().as_str(),
                )
                .await;
            assert!(answer.correct);
        }
    }
    for def in catalog.modules() {
        for section in def.sections() {
            service
                .mark_section_read(def.id().as_str(), section.as_str())
                .await
                .unwrap();
        }
    }

    // streak 10 + sections 200 + modules 400 + course 200 + quizzes 360
    assert_eq!(service.progress().xp, 1170);
    assert_eq!(service.overall_percent(), 100);
    for badge in [
        "first-delegate",
        "workflow-author",
        "speed-demon",
        "perfect-quiz",
        "course-complete",
        "all-perfect",
    ] {
        assert!(service.has_badge(badge), "missing {badge}");
    }
    assert_eq!(service.progress().badges.len(), 12);
    assert_eq!(service.level().level, 6);
    assert!(service.next_level().is_none());

    let reloaded = app.progress_service().await;
    assert_eq!(reloaded.progress(), service.progress());
}

#[tokio::test]
async fn in_memory_services_start_fresh() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()), ProgressPolicy::default())
        .expect("services");
    let service = app.progress_service().await;
    assert_eq!(service.progress().xp, 10);
    assert_eq!(app.catalog().len(), 8);
}
