// ABOUTME: Goal suggestion engine deriving daily targets from recent wearable summaries
// ABOUTME: Produces per-metric suggestions with rationale and an adoptable goal set
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Goal suggestions from wearable data
//!
//! Looks at what the user actually did over the recent window and proposes
//! daily targets a notch above it. With too little data the suggestions fall
//! back to the fitness-level preset; a quiet week must not produce near-zero
//! goals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::suggestion::{
    MIN_DAYS_FOR_ANALYSIS, PRESET_FLOOR_FRACTION, PROGRESSION_MULTIPLIER, STEPS_PER_MILE,
};
use crate::models::{FitnessLevel, GoalMetric, GoalSet, WearableDailySummary};

/// Suggested target at or below the preset reads as easy
const EASY_PRESET_RATIO: f64 = 0.8;
/// Suggested target within this ratio of the preset reads as moderate
const MODERATE_PRESET_RATIO: f64 = 1.25;

/// How demanding a suggested target is relative to the level preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionDifficulty {
    /// Below the preset for this level
    Easy,
    /// Around the preset for this level
    Moderate,
    /// Meaningfully above the preset for this level
    Challenging,
}

/// One suggested daily target with its reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSuggestion {
    /// Metric the suggestion applies to
    pub metric: GoalMetric,
    /// Suggested daily target value
    pub suggested_target: f64,
    /// Unit label matching the metric's goal target
    pub unit: String,
    /// Why this target was chosen
    pub rationale: String,
    /// Demands relative to the level preset
    pub difficulty: SuggestionDifficulty,
}

/// Observed daily averages over the analysis window
#[derive(Debug, Clone, Copy)]
struct ObservedAverages {
    distance_miles: f64,
    active_minutes: f64,
    calories: f64,
    days: usize,
}

fn observe(summaries: &[WearableDailySummary], window_days: usize) -> ObservedAverages {
    let mut recent: Vec<&WearableDailySummary> = summaries.iter().collect();
    recent.sort_by_key(|s| std::cmp::Reverse(s.date));
    recent.truncate(window_days);

    let days = recent.len();
    if days == 0 {
        return ObservedAverages {
            distance_miles: 0.0,
            active_minutes: 0.0,
            calories: 0.0,
            days,
        };
    }

    let mut distance = 0.0;
    let mut minutes = 0.0;
    let mut calories = 0.0;
    for summary in &recent {
        // Some wearables report steps but no distance; derive from steps
        // and keep the larger of the two readings.
        let from_steps = f64::from(summary.steps) / STEPS_PER_MILE;
        distance += summary.distance_miles.max(from_steps);
        minutes += f64::from(summary.active_minutes);
        calories += summary.calories_burned;
    }

    let n = days as f64;
    ObservedAverages {
        distance_miles: distance / n,
        active_minutes: minutes / n,
        calories: calories / n,
        days,
    }
}

fn difficulty_for(target: f64, preset: f64) -> SuggestionDifficulty {
    let ratio = target / preset;
    if ratio < EASY_PRESET_RATIO {
        SuggestionDifficulty::Easy
    } else if ratio < MODERATE_PRESET_RATIO {
        SuggestionDifficulty::Moderate
    } else {
        SuggestionDifficulty::Challenging
    }
}

/// Round a suggested value to a presentable precision for its metric
fn round_target(metric: GoalMetric, value: f64) -> f64 {
    match metric {
        GoalMetric::Distance => (value * 10.0).round() / 10.0,
        GoalMetric::Time | GoalMetric::Calories => value.round(),
    }
}

/// Suggest daily goal targets from recent wearable summaries.
///
/// Averages the most recent `window_days` of data and applies a conservative
/// progression multiplier per metric. Fewer than three days of data yields
/// the fitness-level preset with a rationale saying so. Targets that land
/// below half the preset are raised to the preset.
#[must_use]
pub fn suggest_goals(
    summaries: &[WearableDailySummary],
    level: FitnessLevel,
    window_days: usize,
) -> Vec<GoalSuggestion> {
    let preset = level.preset_goals();
    let observed = observe(summaries, window_days.max(1));

    if observed.days < MIN_DAYS_FOR_ANALYSIS {
        debug!(
            days = observed.days,
            "insufficient wearable history, suggesting level preset"
        );
        return preset
            .iter()
            .map(|(metric, target)| GoalSuggestion {
                metric,
                suggested_target: target.value,
                unit: target.unit.clone(),
                rationale: format!(
                    "Not enough recent wearable data ({} of {MIN_DAYS_FOR_ANALYSIS} days needed); \
                     starting from the {level} preset",
                    observed.days
                ),
                difficulty: SuggestionDifficulty::Moderate,
            })
            .collect();
    }

    let mut suggestions = Vec::with_capacity(3);
    for (metric, preset_target) in preset.iter() {
        let observed_avg = match metric {
            GoalMetric::Distance => observed.distance_miles,
            GoalMetric::Time => observed.active_minutes,
            GoalMetric::Calories => observed.calories,
        };

        let raw = observed_avg * PROGRESSION_MULTIPLIER;
        let (target, rationale) = if raw < preset_target.value * PRESET_FLOOR_FRACTION {
            (
                preset_target.value,
                format!(
                    "Recent {metric} averaged well below the {level} preset; \
                     holding the preset target over {} days of data",
                    observed.days
                ),
            )
        } else {
            (
                round_target(metric, raw),
                format!(
                    "Averaged {observed_avg:.1} {} over the last {} days; \
                     a 10% nudge keeps the target attainable",
                    preset_target.unit, observed.days
                ),
            )
        };

        suggestions.push(GoalSuggestion {
            metric,
            suggested_target: target,
            unit: preset_target.unit.clone(),
            rationale,
            difficulty: difficulty_for(target, preset_target.value),
        });
    }
    suggestions
}

/// Materialize suggestions into a goal set the user can adopt wholesale.
/// Today's accumulated progress carries over; adopting new targets does not
/// erase what was already done.
#[must_use]
pub fn suggested_goal_set(suggestions: &[GoalSuggestion], current: &GoalSet) -> GoalSet {
    let mut adopted = current.clone();
    for suggestion in suggestions {
        let target = adopted.get_mut(suggestion.metric);
        target.value = suggestion.suggested_target;
        target.unit = suggestion.unit.clone();
    }
    adopted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary(day: u32, steps: u32, minutes: u32, miles: f64, calories: f64) -> WearableDailySummary {
        WearableDailySummary {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            steps,
            active_minutes: minutes,
            distance_miles: miles,
            calories_burned: calories,
            sleep_hours: 7.5,
        }
    }

    #[test]
    fn test_sparse_data_falls_back_to_preset() {
        let summaries = vec![summary(1, 8000, 30, 3.5, 320.0)];
        let suggestions = suggest_goals(&summaries, FitnessLevel::Beginner, 7);

        assert_eq!(suggestions.len(), 3);
        let distance = &suggestions[0];
        assert_eq!(distance.metric, GoalMetric::Distance);
        assert_eq!(distance.suggested_target, 2.0);
        assert!(distance.rationale.contains("Not enough"));
    }

    #[test]
    fn test_targets_track_observed_averages() {
        let summaries: Vec<_> = (1..=5)
            .map(|d| summary(d, 6000, 40, 4.0, 400.0))
            .collect();
        let suggestions = suggest_goals(&summaries, FitnessLevel::Intermediate, 7);

        let distance = &suggestions[0];
        // 4.0 miles average * 1.10 = 4.4
        assert_eq!(distance.suggested_target, 4.4);
        assert_eq!(distance.difficulty, SuggestionDifficulty::Challenging);

        let time = &suggestions[1];
        // 40 mins average * 1.10 = 44
        assert_eq!(time.suggested_target, 44.0);

        let calories = &suggestions[2];
        assert_eq!(calories.suggested_target, 440.0);
    }

    #[test]
    fn test_steps_stand_in_for_missing_distance() {
        // 9000 steps with no distance reading derives 4.5 miles.
        let summaries: Vec<_> = (1..=4).map(|d| summary(d, 9000, 30, 0.0, 300.0)).collect();
        let suggestions = suggest_goals(&summaries, FitnessLevel::Beginner, 7);
        let distance = &suggestions[0];
        assert!((distance.suggested_target - 4.5 * PROGRESSION_MULTIPLIER).abs() < 0.11);
    }

    #[test]
    fn test_quiet_week_holds_the_preset() {
        let summaries: Vec<_> = (1..=7).map(|d| summary(d, 500, 5, 0.2, 40.0)).collect();
        let suggestions = suggest_goals(&summaries, FitnessLevel::Advanced, 7);

        for suggestion in &suggestions {
            let preset = FitnessLevel::Advanced.preset_goals();
            assert_eq!(
                suggestion.suggested_target,
                preset.get(suggestion.metric).value
            );
            assert!(suggestion.rationale.contains("holding the preset"));
        }
    }

    #[test]
    fn test_window_limits_history() {
        // Seven heavy days followed by three light ones; window of 3 sees
        // only the light days.
        let mut summaries: Vec<_> = (1..=7).map(|d| summary(d, 0, 60, 6.0, 600.0)).collect();
        summaries.extend((8..=10).map(|d| summary(d, 0, 20, 2.0, 200.0)));

        let suggestions = suggest_goals(&summaries, FitnessLevel::Beginner, 3);
        let time = &suggestions[1];
        assert_eq!(time.suggested_target, 22.0);
    }

    #[test]
    fn test_adoption_preserves_progress() {
        let mut current = FitnessLevel::Beginner.preset_goals();
        current.distance.current = 1.2;

        let summaries: Vec<_> = (1..=5).map(|d| summary(d, 6000, 40, 4.0, 400.0)).collect();
        let suggestions = suggest_goals(&summaries, FitnessLevel::Beginner, 7);
        let adopted = suggested_goal_set(&suggestions, &current);

        assert_eq!(adopted.distance.current, 1.2);
        assert_eq!(adopted.distance.value, 4.4);
        assert!(adopted.validate().is_ok());
    }
}
