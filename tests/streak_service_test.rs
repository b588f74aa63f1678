// ABOUTME: Integration tests for the streak service over the in-memory record store
// ABOUTME: Covers initialization, the progress-to-check-in flow, races, and notifications
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Streak service integration tests

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::ManualClock;
use stride_tracker::config::TrackerConfig;
use stride_tracker::errors::ErrorCode;
use stride_tracker::models::{FitnessLevel, GoalMetric, StreakRecord};
use stride_tracker::notifications::StreakEvent;
use stride_tracker::service::StreakService;
use stride_tracker::store::{InMemoryStore, RecordStore};
use stride_tracker::streak::StreakTransition;
use uuid::Uuid;

fn service_at_january(
    day: u32,
) -> (
    StreakService<InMemoryStore, ManualClock>,
    Arc<InMemoryStore>,
    ManualClock,
) {
    common::init_test_logging();
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::at_january(day);
    let service = StreakService::with_clock(store.clone(), clock.clone(), TrackerConfig::default());
    (service, store, clock)
}

async fn complete_all_goals(
    service: &StreakService<InMemoryStore, ManualClock>,
    user: Uuid,
) -> stride_tracker::service::ProgressSnapshot {
    let goals = service.goals(user).await.unwrap();
    service
        .record_progress(user, GoalMetric::Distance, goals.distance.value)
        .await
        .unwrap();
    service
        .record_progress(user, GoalMetric::Time, goals.time.value)
        .await
        .unwrap();
    service
        .record_progress(user, GoalMetric::Calories, goals.calories.value)
        .await
        .unwrap()
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let (service, store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();

    service.initialize(user).await.unwrap();
    let seeded = store.goals(user).await.unwrap().unwrap();
    assert_eq!(seeded, FitnessLevel::Beginner.preset_goals());

    // A second initialize must not clobber later edits.
    let mut edited = seeded.clone();
    edited.distance.value = 4.0;
    service.update_goals(user, &edited).await.unwrap();
    service.initialize(user).await.unwrap();
    assert_eq!(service.goals(user).await.unwrap(), edited);
}

#[tokio::test]
async fn streak_read_creates_zeroed_record_on_first_access() {
    let (service, store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();

    let record = service.streak(user).await.unwrap();
    assert_eq!(record, StreakRecord::new());
    assert_eq!(
        store.streak_record(user).await.unwrap(),
        Some(StreakRecord::new())
    );
}

#[tokio::test]
async fn goals_before_initialize_is_not_found() {
    let (service, _store, _clock) = service_at_january(1);
    let err = service.goals(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn completing_every_goal_checks_in() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();

    let partial = service
        .record_progress(user, GoalMetric::Distance, 2.0)
        .await
        .unwrap();
    assert_eq!(partial.progress.distance, 100);
    assert!(partial.check_in.is_none());

    let snapshot = complete_all_goals(&service, user).await;
    let check_in = snapshot.check_in.unwrap();
    assert_eq!(check_in.transition, StreakTransition::Started);
    assert_eq!(check_in.record.streak_count, 1);
    assert_eq!(
        check_in.record.last_check_in,
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
}

#[tokio::test]
async fn explicit_check_in_requires_completion() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();

    let err = service.check_in(user).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::GoalsIncomplete);
    assert_eq!(err.context.user_id, Some(user));
}

#[tokio::test]
async fn same_day_completion_does_not_double_count() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();

    complete_all_goals(&service, user).await;
    // Overshooting a goal later the same day re-triggers evaluation.
    let again = service
        .record_progress(user, GoalMetric::Calories, 500.0)
        .await
        .unwrap();

    let check_in = again.check_in.unwrap();
    assert_eq!(check_in.transition, StreakTransition::AlreadyCheckedIn);
    assert_eq!(check_in.record.streak_count, 1);
}

#[tokio::test]
async fn streak_grows_daily_and_resets_after_a_missed_day() {
    let (service, _store, clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();

    for expected in 1..=3 {
        service.reset_daily_progress(user).await.unwrap();
        let snapshot = complete_all_goals(&service, user).await;
        assert_eq!(snapshot.check_in.unwrap().record.streak_count, expected);
        clock.advance_days(1);
    }

    // Rest on Jan 4; come back Jan 5 and the streak restarts at one.
    clock.advance_days(1);
    service.reset_daily_progress(user).await.unwrap();
    let snapshot = complete_all_goals(&service, user).await;
    let check_in = snapshot.check_in.unwrap();
    assert_eq!(check_in.transition, StreakTransition::Reset);
    assert_eq!(check_in.record.streak_count, 1);
}

#[tokio::test]
async fn update_goals_rejects_invalid_targets() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();

    let mut goals = service.goals(user).await.unwrap();
    goals.time.value = 0.0;
    let err = service.update_goals(user, &goals).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidGoal);

    // The stored set is untouched.
    assert_eq!(
        service.goals(user).await.unwrap(),
        FitnessLevel::Beginner.preset_goals()
    );
}

#[tokio::test]
async fn record_progress_rejects_negative_values() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();

    let err = service
        .record_progress(user, GoalMetric::Time, -5.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[tokio::test]
async fn reset_daily_progress_keeps_targets() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();
    complete_all_goals(&service, user).await;

    let goals = service.reset_daily_progress(user).await.unwrap();
    assert_eq!(goals.distance.current, 0.0);
    assert_eq!(goals.calories.current, 0.0);
    assert_eq!(goals, {
        let mut expected = FitnessLevel::Beginner.preset_goals();
        expected.reset_progress();
        expected
    });
}

#[tokio::test]
async fn subscribers_observe_completion_and_streak_events() {
    let (service, _store, clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();
    let mut events = service.notifier().subscribe(user);

    complete_all_goals(&service, user).await;
    assert_eq!(events.recv().await.unwrap(), StreakEvent::GoalsCompleted);
    let started = events.recv().await.unwrap();
    assert!(matches!(
        started,
        StreakEvent::StreakStarted {
            record: StreakRecord {
                streak_count: 1,
                ..
            }
        }
    ));

    clock.advance_days(1);
    service.reset_daily_progress(user).await.unwrap();
    complete_all_goals(&service, user).await;
    assert_eq!(events.recv().await.unwrap(), StreakEvent::GoalsCompleted);
    let extended = events.recv().await.unwrap();
    assert!(matches!(
        extended,
        StreakEvent::StreakExtended {
            record: StreakRecord {
                streak_count: 2,
                ..
            }
        }
    ));
}

#[tokio::test]
async fn users_do_not_share_streaks() {
    let (service, _store, clock) = service_at_january(1);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    service.initialize(alice).await.unwrap();
    service.initialize(bob).await.unwrap();

    complete_all_goals(&service, alice).await;
    clock.advance_days(1);
    service.reset_daily_progress(alice).await.unwrap();
    complete_all_goals(&service, alice).await;

    assert_eq!(service.streak(alice).await.unwrap().streak_count, 2);
    assert_eq!(service.streak(bob).await.unwrap().streak_count, 0);
}

#[tokio::test]
async fn concurrent_check_ins_count_the_day_once() {
    let (service, _store, _clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();
    // Mark every goal complete without going through record_progress, so the
    // check-in itself is what the two contenders race on.
    service
        .update_goals(user, &common::completed_goals())
        .await
        .unwrap();
    let service = Arc::new(service);

    let (a, b) = tokio::join!(service.check_in(user), service.check_in(user));
    let (a, b) = (a.unwrap(), b.unwrap());

    // Exactly one of the two can have advanced the streak; both agree on
    // the resulting record.
    assert_eq!(a.record.streak_count, 1);
    assert_eq!(b.record.streak_count, 1);
    assert_eq!(a.record, b.record);
    assert_eq!(service.streak(user).await.unwrap().streak_count, 1);
}

#[tokio::test]
async fn stale_streak_is_visible_without_mutating_state() {
    let (service, store, clock) = service_at_january(1);
    let user = Uuid::new_v4();
    service.initialize(user).await.unwrap();
    complete_all_goals(&service, user).await;

    clock.advance_days(3);
    let record = service.streak(user).await.unwrap();
    assert_eq!(record.streak_count, 1);
    assert!(record.is_stale(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()));

    // Reading did not write anything back.
    assert_eq!(store.streak_record(user).await.unwrap(), Some(record));
}
