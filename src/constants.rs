// ABOUTME: Application constants for goal presets, streak evaluation, and suggestion tuning
// ABOUTME: Single source of truth for defaults shared by config, models, and the suggestion engine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Application constants
//!
//! Values referenced by more than one module live here so that configuration
//! defaults, preset goal sets, and tests stay in agreement.

/// Preset daily goal targets per fitness level
pub mod goal_presets {
    /// Beginner daily distance target in miles
    pub const BEGINNER_DISTANCE_MILES: f64 = 2.0;
    /// Beginner daily active time target in minutes
    pub const BEGINNER_TIME_MINS: f64 = 20.0;
    /// Beginner daily calorie burn target
    pub const BEGINNER_CALORIES: f64 = 200.0;

    /// Intermediate daily distance target in miles
    pub const INTERMEDIATE_DISTANCE_MILES: f64 = 3.0;
    /// Intermediate daily active time target in minutes
    pub const INTERMEDIATE_TIME_MINS: f64 = 30.0;
    /// Intermediate daily calorie burn target
    pub const INTERMEDIATE_CALORIES: f64 = 300.0;

    /// Advanced daily distance target in miles
    pub const ADVANCED_DISTANCE_MILES: f64 = 5.0;
    /// Advanced daily active time target in minutes
    pub const ADVANCED_TIME_MINS: f64 = 45.0;
    /// Advanced daily calorie burn target
    pub const ADVANCED_CALORIES: f64 = 500.0;

    /// Unit label for distance targets
    pub const DISTANCE_UNIT: &str = "miles";
    /// Unit label for time targets
    pub const TIME_UNIT: &str = "mins";
    /// Unit label for calorie targets
    pub const CALORIES_UNIT: &str = "cal";
}

/// Goal progress evaluation thresholds
pub mod goal_progress {
    /// Progress percentage at which a goal counts as completed
    pub const COMPLETION_PERCENT: u8 = 100;
}

/// Goal suggestion tuning
pub mod suggestion {
    /// Days of wearable history examined when suggesting goals
    pub const DEFAULT_WINDOW_DAYS: usize = 7;

    /// Minimum days of wearable data before suggestions are data-driven
    /// rather than falling back to the fitness-level preset
    pub const MIN_DAYS_FOR_ANALYSIS: usize = 3;

    /// Conservative progression multiplier applied to observed averages.
    /// A 10% nudge keeps suggested targets attainable for daily goals.
    pub const PROGRESSION_MULTIPLIER: f64 = 1.10;

    /// Walking steps per mile used to derive distance from step counts
    pub const STEPS_PER_MILE: f64 = 2_000.0;

    /// Targets below this fraction of the preset are raised to the preset;
    /// a quiet week should not suggest near-zero goals
    pub const PRESET_FLOOR_FRACTION: f64 = 0.5;
}

/// Notification channel sizing
pub mod notifications {
    /// Per-user broadcast channel capacity. Subscribers slower than this
    /// many pending events observe a `Lagged` error from the receiver.
    pub const BROADCAST_CHANNEL_CAPACITY: usize = 32;
}

/// Environment variable names recognized by `TrackerConfig::from_env`
pub mod env_config {
    /// Day boundary policy: `utc` or a fixed offset in hours (e.g. `-5`)
    pub const DAY_BOUNDARY: &str = "STRIDE_DAY_BOUNDARY";
    /// Default fitness level seeded for new users
    pub const DEFAULT_LEVEL: &str = "STRIDE_DEFAULT_LEVEL";
    /// Wearable history window for goal suggestions
    pub const SUGGESTION_WINDOW_DAYS: &str = "STRIDE_SUGGESTION_WINDOW_DAYS";
    /// Per-user notification channel capacity
    pub const BROADCAST_CAPACITY: &str = "STRIDE_BROADCAST_CAPACITY";
}

/// Service identity used by logging
pub mod service_names {
    /// Canonical service name for structured log output
    pub const STRIDE_TRACKER: &str = "stride-tracker";
}
