// ABOUTME: Runtime configuration for the tracker: day-boundary policy and service defaults
// ABOUTME: Loads TrackerConfig from environment variables with constants-backed defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Environment-based configuration
//!
//! The one policy decision every deployment must make explicitly is the
//! day-boundary timezone: which calendar day a timestamp belongs to. The
//! engine itself is pure; [`DayBoundary`] is the single place that policy
//! lives, and it defaults to UTC-normalized calendar days so that streaks
//! are stable across device timezone changes and DST transitions.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{env_config, notifications, suggestion};
use crate::errors::{AppError, AppResult};
use crate::models::FitnessLevel;

/// Timezone policy for resolving a timestamp to a calendar day.
///
/// Check-ins only care about calendar-day boundaries, so the policy must be
/// consistent for a given user's records; mixing policies miscounts streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DayBoundary {
    /// UTC-normalized calendar day (the default)
    #[default]
    Utc,
    /// Fixed offset from UTC in whole hours, e.g. `-5` for US Eastern
    /// Standard Time. No DST adjustment is applied; that is the point.
    FixedOffsetHours(i8),
}

impl DayBoundary {
    /// Resolve a timestamp to the calendar day it falls on under this policy
    #[must_use]
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Utc => at.date_naive(),
            Self::FixedOffsetHours(hours) => FixedOffset::east_opt(i32::from(*hours) * 3600)
                .map_or_else(
                    || at.date_naive(),
                    |offset| at.with_timezone(&offset).date_naive(),
                ),
        }
    }
}

impl Display for DayBoundary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::FixedOffsetHours(hours) => write!(f, "{hours}"),
        }
    }
}

impl FromStr for DayBoundary {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") {
            return Ok(Self::Utc);
        }
        let hours: i8 = trimmed.parse().map_err(|_| {
            AppError::config(format!(
                "invalid day boundary '{trimmed}' (expected 'utc' or offset hours)"
            ))
        })?;
        if !(-12..=14).contains(&hours) {
            return Err(AppError::config(format!(
                "day boundary offset {hours} outside -12..=14"
            )));
        }
        Ok(Self::FixedOffsetHours(hours))
    }
}

/// Runtime configuration for the tracker service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Calendar-day resolution policy for check-ins
    pub day_boundary: DayBoundary,
    /// Fitness level seeded for users with no stored goals
    pub default_level: FitnessLevel,
    /// Days of wearable history examined by goal suggestion
    pub suggestion_window_days: usize,
    /// Per-user notification channel capacity
    pub broadcast_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            day_boundary: DayBoundary::Utc,
            default_level: FitnessLevel::Beginner,
            suggestion_window_days: suggestion::DEFAULT_WINDOW_DAYS,
            broadcast_capacity: notifications::BROADCAST_CHANNEL_CAPACITY,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset. Malformed values are rejected rather
    /// than silently defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let day_boundary = match env::var(env_config::DAY_BOUNDARY) {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.day_boundary,
        };

        let default_level = match env::var(env_config::DEFAULT_LEVEL) {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::config(format!("invalid fitness level '{raw}'")))?,
            Err(_) => defaults.default_level,
        };

        let suggestion_window_days = match env::var(env_config::SUGGESTION_WINDOW_DAYS) {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::config(format!("invalid suggestion window '{raw}'")))?,
            Err(_) => defaults.suggestion_window_days,
        };

        let broadcast_capacity = match env::var(env_config::BROADCAST_CAPACITY) {
            Ok(raw) => {
                let capacity: usize = raw
                    .parse()
                    .map_err(|_| AppError::config(format!("invalid broadcast capacity '{raw}'")))?;
                if capacity == 0 {
                    warn!("broadcast capacity 0 requested, using 1");
                    1
                } else {
                    capacity
                }
            }
            Err(_) => defaults.broadcast_capacity,
        };

        Ok(Self {
            day_boundary,
            default_level,
            suggestion_window_days,
            broadcast_capacity,
        })
    }
}
