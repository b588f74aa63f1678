// ABOUTME: Pure streak engine: goal progress evaluation and the daily check-in state machine
// ABOUTME: Implements the five-row transition table deciding increment, hold, or reset per day
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! # Streak Engine
//!
//! The core of the tracker: stateless functions deciding goal completion and
//! streak advancement. Everything here is pure given its inputs (the record,
//! the timestamp, and the day-boundary policy), so the state machine is unit
//! testable without mocking anything beyond `now`.
//!
//! A streak advances at most once per calendar day, and only when every goal
//! in the user's set has reached 100% progress. That gate lives in the
//! service layer; this module owns the per-day arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::DayBoundary;
use crate::constants::goal_progress::COMPLETION_PERCENT;
use crate::errors::{AppError, AppResult};
use crate::models::{GoalMetric, GoalSet, StreakRecord};

/// Completion percentage per metric, each guaranteed in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Distance completion percent
    pub distance: u8,
    /// Time completion percent
    pub time: u8,
    /// Calories completion percent
    pub calories: u8,
}

impl GoalProgress {
    /// Progress percent for a metric
    #[must_use]
    pub const fn get(&self, metric: GoalMetric) -> u8 {
        match metric {
            GoalMetric::Distance => self.distance,
            GoalMetric::Time => self.time,
            GoalMetric::Calories => self.calories,
        }
    }

    /// True iff every metric is at completion
    #[must_use]
    pub fn all_completed(&self) -> bool {
        GoalMetric::ALL
            .iter()
            .all(|&m| self.get(m) >= COMPLETION_PERCENT)
    }
}

/// Evaluate completion percentage for each goal in the set.
///
/// Each percent is `round(current / value * 100)` clamped to `[0, 100]`.
/// A non-positive target is a configuration error, not a runtime one, so it
/// fails loudly instead of propagating `NaN` or `Infinity` into percentages.
///
/// # Errors
///
/// Returns `InvalidGoal` if any target value is zero, negative, or not
/// finite. Goal sets validated at the record-store boundary never trigger
/// this.
pub fn evaluate_goal_progress(goals: &GoalSet) -> AppResult<GoalProgress> {
    let mut percents = [0_u8; 3];
    for (slot, (metric, target)) in percents.iter_mut().zip(goals.iter()) {
        if !target.value.is_finite() || target.value <= 0.0 {
            return Err(AppError::invalid_goal(metric.to_string(), target.value));
        }
        let raw = (target.current / target.value * 100.0).round();
        *slot = raw.clamp(0.0, 100.0) as u8;
    }
    Ok(GoalProgress {
        distance: percents[0],
        time: percents[1],
        calories: percents[2],
    })
}

/// True iff every goal in the set has reached 100% progress. No side effects.
///
/// # Errors
///
/// Returns `InvalidGoal` under the same conditions as
/// [`evaluate_goal_progress`].
pub fn all_goals_completed(goals: &GoalSet) -> AppResult<bool> {
    Ok(evaluate_goal_progress(goals)?.all_completed())
}

/// Which row of the transition table fired for a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
    /// First-ever check-in; streak becomes 1
    Started,
    /// Consecutive day; streak grew by one
    Extended,
    /// Second check-in on the same calendar day; nothing changed
    AlreadyCheckedIn,
    /// One or more days were missed; streak reset to 1
    Reset,
    /// The stored check-in date is in the future relative to `now`: clock
    /// skew or a backdated record. Treated as a no-op and flagged.
    ClockSkew,
}

impl StreakTransition {
    /// Whether this transition changed the stored record
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Started | Self::Extended | Self::Reset)
    }
}

/// Result of running the check-in state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    /// The record after the transition (identical to the input for no-ops)
    pub record: StreakRecord,
    /// Which transition fired
    pub transition: StreakTransition,
}

/// Run the daily check-in state machine.
///
/// Precondition (enforced by the caller): all goals just completed for this
/// user. Given the stored record and the current timestamp, decides whether
/// the streak starts, extends, holds, or resets:
///
/// | last check-in | days since | streak | meaning |
/// |---|---|---|---|
/// | none | - | 1 | first-ever check-in |
/// | set | 0 | unchanged | already counted today |
/// | set | 1 | +1 | consecutive day |
/// | set | > 1 | 1 | missed a day, reset |
/// | set | < 0 | unchanged | clock skew, no-op |
///
/// Pure given `(record, now)`; the caller persists the returned record.
#[must_use]
pub fn update_streak(
    record: &StreakRecord,
    now: DateTime<Utc>,
    boundary: DayBoundary,
) -> StreakUpdate {
    let today = boundary.day_of(now);

    let Some(last) = record.last_check_in else {
        return StreakUpdate {
            record: StreakRecord {
                streak_count: 1,
                last_check_in: Some(today),
            },
            transition: StreakTransition::Started,
        };
    };

    let days_since = (today - last).num_days();
    match days_since {
        0 => StreakUpdate {
            record: *record,
            transition: StreakTransition::AlreadyCheckedIn,
        },
        1 => StreakUpdate {
            record: StreakRecord {
                streak_count: record.streak_count + 1,
                last_check_in: Some(today),
            },
            transition: StreakTransition::Extended,
        },
        d if d > 1 => StreakUpdate {
            record: StreakRecord {
                streak_count: 1,
                last_check_in: Some(today),
            },
            transition: StreakTransition::Reset,
        },
        _ => {
            warn!(
                last_check_in = %last,
                today = %today,
                "check-in date is ahead of the clock, ignoring"
            );
            StreakUpdate {
                record: *record,
                transition: StreakTransition::ClockSkew,
            }
        }
    }
}
