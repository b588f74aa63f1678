// ABOUTME: Core data models for goal tracking: metrics, targets, goal sets, and streak records
// ABOUTME: Defines GoalMetric, GoalTarget, GoalSet, StreakRecord, FitnessLevel, and wearable summaries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! # Data Models
//!
//! Core data structures for the streak tracking engine.
//!
//! ## Design Principles
//!
//! - **Explicit structure**: `GoalSet` enumerates its three metrics as named
//!   fields rather than an open map; unknown keys are rejected during
//!   deserialization instead of silently defaulted.
//! - **Date-only precision**: `StreakRecord::last_check_in` is a calendar
//!   date. Time-of-day never influences the streak state machine, so it is
//!   not stored and cannot be corrupted by timezone or DST drift.
//! - **Boundary validation**: records are validated where they enter the
//!   record store, not deep inside the engine.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::goal_presets;
use crate::errors::{AppError, AppResult};

/// A tracked daily goal metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMetric {
    /// Distance covered, in the goal's unit (miles by default)
    Distance,
    /// Active time, in minutes
    Time,
    /// Energy burned, in calories
    Calories,
}

impl GoalMetric {
    /// All metrics in a fixed, stable order
    pub const ALL: [Self; 3] = [Self::Distance, Self::Time, Self::Calories];
}

impl Display for GoalMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Distance => write!(f, "distance"),
            Self::Time => write!(f, "time"),
            Self::Calories => write!(f, "calories"),
        }
    }
}

impl FromStr for GoalMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distance" => Ok(Self::Distance),
            "time" => Ok(Self::Time),
            "calories" => Ok(Self::Calories),
            other => Err(AppError::out_of_range(format!(
                "unknown goal metric '{other}'"
            ))),
        }
    }
}

/// One tracked metric: a daily target and the value accumulated so far today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalTarget {
    /// Target value for the day; must be positive
    pub value: f64,
    /// Unit label (e.g. "miles", "mins", "cal")
    pub unit: String,
    /// Value accumulated so far today; never negative
    pub current: f64,
}

impl GoalTarget {
    /// Create a target with zero accumulated progress
    #[must_use]
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            current: 0.0,
        }
    }
}

/// The full set of daily goals for one user. All three metrics are always
/// present; there is no partial goal set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalSet {
    /// Daily distance goal
    pub distance: GoalTarget,
    /// Daily active time goal
    pub time: GoalTarget,
    /// Daily calorie goal
    pub calories: GoalTarget,
}

impl GoalSet {
    /// Iterate metrics with their targets in stable order
    pub fn iter(&self) -> impl Iterator<Item = (GoalMetric, &GoalTarget)> {
        [
            (GoalMetric::Distance, &self.distance),
            (GoalMetric::Time, &self.time),
            (GoalMetric::Calories, &self.calories),
        ]
        .into_iter()
    }

    /// Get the target for a metric
    #[must_use]
    pub const fn get(&self, metric: GoalMetric) -> &GoalTarget {
        match metric {
            GoalMetric::Distance => &self.distance,
            GoalMetric::Time => &self.time,
            GoalMetric::Calories => &self.calories,
        }
    }

    /// Get the mutable target for a metric
    pub fn get_mut(&mut self, metric: GoalMetric) -> &mut GoalTarget {
        match metric {
            GoalMetric::Distance => &mut self.distance,
            GoalMetric::Time => &mut self.time,
            GoalMetric::Calories => &mut self.calories,
        }
    }

    /// Validate the invariants `value > 0` and `current >= 0` for every
    /// metric. Applied at the record-store boundary so that no stored goal
    /// set can later fail progress evaluation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal` for a non-positive or non-finite target value,
    /// `ValueOutOfRange` for a negative or non-finite accumulated value.
    pub fn validate(&self) -> AppResult<()> {
        for (metric, target) in self.iter() {
            if !target.value.is_finite() || target.value <= 0.0 {
                return Err(AppError::invalid_goal(metric.to_string(), target.value));
            }
            if !target.current.is_finite() || target.current < 0.0 {
                return Err(AppError::out_of_range(format!(
                    "goal '{metric}' has negative progress {}",
                    target.current
                ))
                .with_resource_id(metric.to_string()));
            }
        }
        Ok(())
    }

    /// Zero all accumulated progress, keeping targets (start of a new day)
    pub fn reset_progress(&mut self) {
        self.distance.current = 0.0;
        self.time.current = 0.0;
        self.calories.current = 0.0;
    }
}

/// User fitness level determining preset daily goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    /// New to regular exercise
    #[default]
    Beginner,
    /// Exercising consistently for a few months
    Intermediate,
    /// Training regularly with higher volume
    Advanced,
}

impl FitnessLevel {
    /// Preset daily goal set for this level
    #[must_use]
    pub fn preset_goals(self) -> GoalSet {
        let (distance, time, calories) = match self {
            Self::Beginner => (
                goal_presets::BEGINNER_DISTANCE_MILES,
                goal_presets::BEGINNER_TIME_MINS,
                goal_presets::BEGINNER_CALORIES,
            ),
            Self::Intermediate => (
                goal_presets::INTERMEDIATE_DISTANCE_MILES,
                goal_presets::INTERMEDIATE_TIME_MINS,
                goal_presets::INTERMEDIATE_CALORIES,
            ),
            Self::Advanced => (
                goal_presets::ADVANCED_DISTANCE_MILES,
                goal_presets::ADVANCED_TIME_MINS,
                goal_presets::ADVANCED_CALORIES,
            ),
        };
        GoalSet {
            distance: GoalTarget::new(distance, goal_presets::DISTANCE_UNIT),
            time: GoalTarget::new(time, goal_presets::TIME_UNIT),
            calories: GoalTarget::new(calories, goal_presets::CALORIES_UNIT),
        }
    }
}

impl Display for FitnessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for FitnessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(AppError::out_of_range(format!(
                "unknown fitness level '{other}'"
            ))),
        }
    }
}

/// Per-user streak state. Owned by the streak engine; mutated only through
/// its update operation; never deleted for the lifetime of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Count of consecutive calendar days with all goals completed
    pub streak_count: u32,
    /// Calendar day of the most recent check-in, `None` before the first
    pub last_check_in: Option<NaiveDate>,
}

impl StreakRecord {
    /// Zero-value record created on first access for a user
    #[must_use]
    pub const fn new() -> Self {
        Self {
            streak_count: 0,
            last_check_in: None,
        }
    }

    /// Whether the streak has lapsed: more than one day has passed since
    /// the last check-in, so the next check-in will reset rather than
    /// extend. Reads never mutate stored state; this is the display-side
    /// view of staleness.
    #[must_use]
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.last_check_in
            .is_some_and(|last| (today - last).num_days() > 1)
    }
}

impl Default for StreakRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// One day of synced wearable data, the input to goal suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearableDailySummary {
    /// Calendar day the summary covers
    pub date: NaiveDate,
    /// Step count for the day
    pub steps: u32,
    /// Minutes of recorded activity
    pub active_minutes: u32,
    /// Distance covered in miles
    pub distance_miles: f64,
    /// Energy burned in calories
    pub calories_burned: f64,
    /// Hours of sleep recorded the preceding night
    pub sleep_hours: f64,
}
