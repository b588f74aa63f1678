// ABOUTME: Record store abstraction for per-user streak records and goal sets
// ABOUTME: Defines the RecordStore trait implemented by pluggable persistence backends
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Record store abstraction
//!
//! All persistence implementations provide this trait so the service layer
//! stays agnostic of storage technology. Absent records are `Ok(None)`, not
//! errors; I/O failures are returned verbatim with no retry. Retry and
//! backoff, where wanted, belong to the backend, not to callers.
//!
//! A failed put must leave the previously stored record authoritative, so
//! that a check-in is atomic from the caller's point of view: either the new
//! record is durably stored or the old one still stands.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{GoalSet, StreakRecord};

pub mod memory;

pub use memory::InMemoryStore;

/// Core record store trait
///
/// One streak record and one goal set per user id. Implementations must
/// validate goal sets on write (`GoalSet::validate`) so that no stored set
/// can fail progress evaluation later.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Get the streak record for a user, `None` if the user has none yet
    async fn streak_record(&self, user_id: Uuid) -> Result<Option<StreakRecord>>;

    /// Store the streak record for a user, replacing any previous one
    async fn put_streak_record(&self, user_id: Uuid, record: &StreakRecord) -> Result<()>;

    /// Store the streak record only if the currently stored `last_check_in`
    /// equals `expected_last_check_in` (with "no record yet" treated as
    /// `None`). Returns whether the write happened.
    ///
    /// This compare-and-set is the serialization point that stops two
    /// near-simultaneous completions from both reading a one-day gap and
    /// double-counting the same calendar day.
    async fn compare_and_put_streak(
        &self,
        user_id: Uuid,
        expected_last_check_in: Option<NaiveDate>,
        record: &StreakRecord,
    ) -> Result<bool>;

    /// Get the goal set for a user, `None` if the user has none yet
    async fn goals(&self, user_id: Uuid) -> Result<Option<GoalSet>>;

    /// Store the goal set for a user after validating its invariants
    async fn put_goals(&self, user_id: Uuid, goals: &GoalSet) -> Result<()>;
}
