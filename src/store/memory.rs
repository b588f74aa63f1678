// ABOUTME: In-memory record store backed by a sharded concurrent map
// ABOUTME: Reference RecordStore implementation with atomic compare-and-set on check-in dates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! In-memory record store
//!
//! The reference [`RecordStore`] implementation. Entries are held per user
//! in a sharded concurrent map, so operations for different users never
//! contend; the compare-and-set holds the user's shard entry for the
//! duration of the check, making it atomic with respect to other writers of
//! the same user.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use super::RecordStore;
use crate::models::{GoalSet, StreakRecord};

/// Stored state for one user
#[derive(Debug, Default, Clone)]
struct UserEntry {
    streak: Option<StreakRecord>,
    goals: Option<GoalSet>,
}

/// In-memory record store, cheap to clone and share across tasks
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: std::sync::Arc<DashMap<Uuid, UserEntry>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with any stored state (for tests and monitoring)
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn streak_record(&self, user_id: Uuid) -> Result<Option<StreakRecord>> {
        Ok(self.entries.get(&user_id).and_then(|e| e.streak))
    }

    async fn put_streak_record(&self, user_id: Uuid, record: &StreakRecord) -> Result<()> {
        self.entries.entry(user_id).or_default().streak = Some(*record);
        Ok(())
    }

    async fn compare_and_put_streak(
        &self,
        user_id: Uuid,
        expected_last_check_in: Option<NaiveDate>,
        record: &StreakRecord,
    ) -> Result<bool> {
        // The entry guard locks this user's shard, so check-then-write is
        // atomic with respect to concurrent writers of the same user.
        let mut entry = self.entries.entry(user_id).or_default();
        let stored_last = entry.streak.as_ref().and_then(|r| r.last_check_in);
        if stored_last == expected_last_check_in {
            entry.streak = Some(*record);
            Ok(true)
        } else {
            debug!(%user_id, "check-in CAS lost: record changed underneath");
            Ok(false)
        }
    }

    async fn goals(&self, user_id: Uuid) -> Result<Option<GoalSet>> {
        Ok(self.entries.get(&user_id).and_then(|e| e.goals.clone()))
    }

    async fn put_goals(&self, user_id: Uuid, goals: &GoalSet) -> Result<()> {
        goals.validate()?;
        self.entries.entry(user_id).or_default().goals = Some(goals.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FitnessLevel;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[tokio::test]
    async fn test_absent_records_are_none() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        assert!(store.streak_record(user).await.unwrap().is_none());
        assert!(store.goals(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_and_get_round_trip() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let record = StreakRecord {
            streak_count: 3,
            last_check_in: Some(date(10)),
        };

        store.put_streak_record(user, &record).await.unwrap();
        assert_eq!(store.streak_record(user).await.unwrap(), Some(record));

        let goals = FitnessLevel::Advanced.preset_goals();
        store.put_goals(user, &goals).await.unwrap();
        assert_eq!(store.goals(user).await.unwrap(), Some(goals));
    }

    #[tokio::test]
    async fn test_put_goals_validates() {
        let store = InMemoryStore::new();
        let mut goals = FitnessLevel::Beginner.preset_goals();
        goals.distance.value = -1.0;
        assert!(store.put_goals(Uuid::new_v4(), &goals).await.is_err());
    }

    #[tokio::test]
    async fn test_cas_rejects_stale_expectation() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let day10 = StreakRecord {
            streak_count: 1,
            last_check_in: Some(date(10)),
        };
        let day11 = StreakRecord {
            streak_count: 2,
            last_check_in: Some(date(11)),
        };

        // First writer wins from the empty state.
        assert!(store.compare_and_put_streak(user, None, &day10).await.unwrap());
        // A second writer that also read the empty state loses.
        assert!(!store.compare_and_put_streak(user, None, &day11).await.unwrap());
        // Writing with the fresh expectation succeeds.
        assert!(store
            .compare_and_put_streak(user, Some(date(10)), &day11)
            .await
            .unwrap());
        assert_eq!(store.streak_record(user).await.unwrap(), Some(day11));
    }
}
