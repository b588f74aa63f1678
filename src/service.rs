// ABOUTME: Domain service orchestrating the streak engine, record store, clock, and notifier
// ABOUTME: Owns initialize/get flows, goal CRUD, progress recording, and the check-in write path
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Streak service
//!
//! Protocol-agnostic orchestration over the pure engine: any entry point
//! (REST handler, job runner, CLI) goes through here so the business rules
//! stay in one place. The service holds no per-user state of its own: the
//! record store is the single source of truth, and UI surfaces observe
//! changes through the notifier rather than sharing mutable state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{GoalMetric, GoalSet, StreakRecord};
use crate::notifications::{StreakEvent, StreakNotifier};
use crate::store::RecordStore;
use crate::streak::{self, GoalProgress, StreakTransition, StreakUpdate};

/// Result of recording a progress value: the updated goals, their evaluated
/// progress, and the check-in outcome when this update completed the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Goal set after the update
    pub goals: GoalSet,
    /// Evaluated completion percentages
    pub progress: GoalProgress,
    /// Set when this update pushed every goal to completion
    pub check_in: Option<StreakUpdate>,
}

/// Orchestrates streak evaluation for all users against a record store
pub struct StreakService<S: RecordStore, C: Clock = SystemClock> {
    store: Arc<S>,
    clock: C,
    notifier: StreakNotifier,
    config: TrackerConfig,
}

impl<S: RecordStore> StreakService<S> {
    /// Create a service over a store with the system clock
    #[must_use]
    pub fn new(store: Arc<S>, config: TrackerConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S: RecordStore, C: Clock> StreakService<S, C> {
    /// Create a service with an injected clock (tests drive day transitions
    /// this way)
    #[must_use]
    pub fn with_clock(store: Arc<S>, clock: C, config: TrackerConfig) -> Self {
        let notifier = StreakNotifier::new(config.broadcast_capacity);
        Self {
            store,
            clock,
            notifier,
            config,
        }
    }

    /// The notifier surfaces subscribe through
    #[must_use]
    pub const fn notifier(&self) -> &StreakNotifier {
        &self.notifier
    }

    /// Idempotently create the user's records: a zeroed streak record and
    /// the configured default goal preset. Existing records are untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record store fails.
    pub async fn initialize(&self, user_id: Uuid) -> AppResult<()> {
        if self.store.streak_record(user_id).await?.is_none() {
            self.store
                .put_streak_record(user_id, &StreakRecord::new())
                .await?;
            info!(%user_id, "created zeroed streak record");
        }
        if self.store.goals(user_id).await?.is_none() {
            let preset = self.config.default_level.preset_goals();
            self.store.put_goals(user_id, &preset).await?;
            info!(%user_id, level = %self.config.default_level, "seeded preset goals");
        }
        Ok(())
    }

    /// Get the user's streak record, creating a zeroed one on first access
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record store fails.
    pub async fn streak(&self, user_id: Uuid) -> AppResult<StreakRecord> {
        if let Some(record) = self.store.streak_record(user_id).await? {
            return Ok(record);
        }
        let record = StreakRecord::new();
        self.store.put_streak_record(user_id, &record).await?;
        info!(%user_id, "created zeroed streak record on first access");
        Ok(record)
    }

    /// Get the user's goal set
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user has no goals yet (call
    /// [`StreakService::initialize`] first), `StorageError` on store failure.
    pub async fn goals(&self, user_id: Uuid) -> AppResult<GoalSet> {
        self.store
            .goals(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("goal set").with_user_id(user_id))
    }

    /// Replace the user's goal set after validating its invariants
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal`/`ValueOutOfRange` for invariant violations,
    /// `StorageError` on store failure.
    pub async fn update_goals(&self, user_id: Uuid, goals: &GoalSet) -> AppResult<()> {
        goals.validate().map_err(|e| e.with_user_id(user_id))?;
        self.store.put_goals(user_id, goals).await?;
        debug!(%user_id, "goal targets updated");
        Ok(())
    }

    /// Record an accumulated progress value for one metric (the goal-input
    /// path fed by wearable sync). When the update pushes every goal to
    /// completion, the daily check-in runs as part of the same call.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a negative or non-finite value,
    /// `ResourceNotFound` if the user has no goals, `StorageError` on store
    /// failure.
    pub async fn record_progress(
        &self,
        user_id: Uuid,
        metric: GoalMetric,
        value: f64,
    ) -> AppResult<ProgressSnapshot> {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::out_of_range(format!(
                "progress value {value} for '{metric}' must be non-negative"
            ))
            .with_user_id(user_id));
        }

        let mut goals = self.goals(user_id).await?;
        let was_completed = streak::all_goals_completed(&goals)?;

        goals.get_mut(metric).current = value;
        self.store.put_goals(user_id, &goals).await?;

        let progress = streak::evaluate_goal_progress(&goals)?;
        debug!(%user_id, %metric, value, percent = progress.get(metric), "progress recorded");

        let check_in = if progress.all_completed() {
            if !was_completed {
                self.notifier.publish(user_id, &StreakEvent::GoalsCompleted);
            }
            Some(self.check_in(user_id).await?)
        } else {
            None
        };

        Ok(ProgressSnapshot {
            goals,
            progress,
            check_in,
        })
    }

    /// Run the daily check-in for a user whose goals are all completed.
    ///
    /// At-most-once-per-day is enforced by the state machine (a second call
    /// on the same calendar day is a no-op), and concurrent calls for the
    /// same user serialize on the store's compare-and-set: a writer that
    /// loses the race re-reads once, and a second loss means the day was
    /// already counted by the other writer.
    ///
    /// # Errors
    ///
    /// Returns `GoalsIncomplete` if any goal is below completion,
    /// `ResourceNotFound` if the user has no goals, `StorageError` on store
    /// failure.
    pub async fn check_in(&self, user_id: Uuid) -> AppResult<StreakUpdate> {
        let goals = self.goals(user_id).await?;
        if !streak::all_goals_completed(&goals)? {
            return Err(AppError::goals_incomplete(user_id));
        }

        let now = self.clock.now();
        for attempt in 0..2 {
            let stored = self
                .store
                .streak_record(user_id)
                .await?
                .unwrap_or_default();
            let update = streak::update_streak(&stored, now, self.config.day_boundary);

            if !update.transition.changed() {
                debug!(%user_id, transition = ?update.transition, "check-in is a no-op");
                return Ok(update);
            }

            if self
                .store
                .compare_and_put_streak(user_id, stored.last_check_in, &update.record)
                .await?
            {
                info!(
                    %user_id,
                    streak = update.record.streak_count,
                    transition = ?update.transition,
                    "daily check-in recorded"
                );
                if let Some(event) = StreakEvent::from_update(&update) {
                    self.notifier.publish(user_id, &event);
                }
                return Ok(update);
            }
            debug!(%user_id, attempt, "check-in lost the write race, re-reading");
        }

        // Losing the CAS twice means another writer advanced the record for
        // today; surface that as the idempotent same-day outcome.
        let stored = self
            .store
            .streak_record(user_id)
            .await?
            .unwrap_or_default();
        Ok(StreakUpdate {
            record: stored,
            transition: StreakTransition::AlreadyCheckedIn,
        })
    }

    /// Zero all accumulated progress for the day, keeping targets
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user has no goals, `StorageError`
    /// on store failure.
    pub async fn reset_daily_progress(&self, user_id: Uuid) -> AppResult<GoalSet> {
        let mut goals = self.goals(user_id).await?;
        goals.reset_progress();
        self.store.put_goals(user_id, &goals).await?;
        debug!(%user_id, "daily progress reset");
        Ok(goals)
    }
}
