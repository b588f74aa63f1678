// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides quiet logging setup, a manual clock, and goal fixtures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs
#![allow(dead_code)]

//! Shared test utilities for `stride_tracker`
//!
//! Common setup to reduce duplication across integration tests.

use std::sync::{Arc, Mutex, Once};

use chrono::{DateTime, Duration, TimeZone, Utc};
use stride_tracker::clock::Clock;
use stride_tracker::models::{FitnessLevel, GoalSet};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Clock whose time tests set explicitly
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    /// Create a clock pinned at the given instant
    pub fn pinned_at(at: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(at)))
    }

    /// Create a clock pinned at noon UTC on a day of January 2024
    pub fn at_january(day: u32) -> Self {
        Self::pinned_at(january(day))
    }

    /// Move the clock to a new instant
    pub fn set(&self, at: DateTime<Utc>) {
        *self.0.lock().unwrap() = at;
    }

    /// Advance the clock by whole days
    pub fn advance_days(&self, days: i64) {
        let mut now = self.0.lock().unwrap();
        *now += Duration::days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Noon UTC on a day of January 2024
pub fn january(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

/// A beginner goal set with every metric exactly at its target
pub fn completed_goals() -> GoalSet {
    let mut goals = FitnessLevel::Beginner.preset_goals();
    goals.distance.current = goals.distance.value;
    goals.time.current = goals.time.value;
    goals.calories.current = goals.calories.value;
    goals
}
