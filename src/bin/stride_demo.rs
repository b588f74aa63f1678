// ABOUTME: Demo driver replaying a multi-day goal history against the in-memory store
// ABOUTME: Shows progress evaluation, check-ins, streak growth, resets, and notifications
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Demo driver for the streak tracking engine.
//!
//! Seeds a user, replays a configurable number of days of goal progress
//! (skipping a rest day to show the reset), and prints each transition.
//!
//! Usage:
//! ```bash
//! # Replay the default seven days
//! cargo run --bin stride-demo
//!
//! # Replay two weeks at the advanced preset
//! cargo run --bin stride-demo -- --days 14 --level advanced
//! ```

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Parser;
use tracing::info;
use uuid::Uuid;

use stride_tracker::clock::Clock;
use stride_tracker::config::TrackerConfig;
use stride_tracker::logging::LoggingConfig;
use stride_tracker::models::{FitnessLevel, GoalMetric, WearableDailySummary};
use stride_tracker::service::StreakService;
use stride_tracker::store::InMemoryStore;
use stride_tracker::suggestions;

#[derive(Parser)]
#[command(
    name = "stride-demo",
    about = "Stride Tracker demo driver",
    long_about = "Replay a multi-day goal history and print streak transitions"
)]
struct DemoArgs {
    /// Number of days to replay
    #[arg(long, default_value = "7")]
    days: u32,

    /// Fitness level preset to seed (beginner, intermediate, advanced)
    #[arg(long, default_value = "beginner")]
    level: String,

    /// Day (1-based) on which the user rests and the streak lapses
    #[arg(long, default_value = "5")]
    rest_day: u32,
}

/// Replay clock stepping through scripted days
struct ReplayClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl ReplayClock {
    fn starting(at: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(at),
        }
    }

    fn advance_to(&self, at: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = at;
        }
    }
}

impl Clock for ReplayClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    LoggingConfig::from_env().init()?;
    let args = DemoArgs::parse();
    let level = FitnessLevel::from_str(&args.level)?;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(); // Safe: constant date
    let clock = Arc::new(ReplayClock::starting(start));
    let store = Arc::new(InMemoryStore::new());
    let config = TrackerConfig {
        default_level: level,
        ..TrackerConfig::default()
    };
    let service = StreakService::with_clock(store, SharedClock(clock.clone()), config);

    let user = Uuid::new_v4();
    service.initialize(user).await?;
    let mut events = service.notifier().subscribe(user);

    let goals = service.goals(user).await?;
    info!(%user, level = %level, "seeded user");
    println!(
        "targets: {} {} / {} {} / {} {}",
        goals.distance.value,
        goals.distance.unit,
        goals.time.value,
        goals.time.unit,
        goals.calories.value,
        goals.calories.unit
    );

    let mut summaries = Vec::new();
    for day in 1..=args.days {
        clock.advance_to(start + Duration::days(i64::from(day) - 1));

        if day == args.rest_day {
            println!("day {day}: rest day, no activity");
            service.reset_daily_progress(user).await?;
            continue;
        }

        let goals = service.goals(user).await?;
        service.reset_daily_progress(user).await?;
        service
            .record_progress(user, GoalMetric::Distance, goals.distance.value)
            .await?;
        service
            .record_progress(user, GoalMetric::Time, goals.time.value)
            .await?;
        let snapshot = service
            .record_progress(user, GoalMetric::Calories, goals.calories.value)
            .await?;

        if let Some(check_in) = snapshot.check_in {
            println!(
                "day {day}: all goals done, streak {} ({:?})",
                check_in.record.streak_count, check_in.transition
            );
        }
        while let Ok(event) = events.try_recv() {
            info!(?event, "notification");
        }

        summaries.push(WearableDailySummary {
            date: clock.now().date_naive(),
            steps: (goals.distance.value * 2_000.0).round() as u32,
            active_minutes: goals.time.value.round() as u32,
            distance_miles: goals.distance.value,
            calories_burned: goals.calories.value,
            sleep_hours: 7.5,
        });
    }

    let record = service.streak(user).await?;
    println!(
        "final streak: {} (last check-in {:?})",
        record.streak_count, record.last_check_in
    );

    println!("suggested goals from the replayed week:");
    for suggestion in suggestions::suggest_goals(&summaries, level, 7) {
        println!(
            "  {}: {} {} ({:?}) - {}",
            suggestion.metric,
            suggestion.suggested_target,
            suggestion.unit,
            suggestion.difficulty,
            suggestion.rationale
        );
    }

    Ok(())
}

/// Adapter sharing one replay clock with the service
struct SharedClock(Arc<ReplayClock>);

impl Clock for SharedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.now()
    }
}
