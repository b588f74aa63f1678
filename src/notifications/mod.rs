// ABOUTME: Observer layer broadcasting streak and goal events to per-user subscribers
// ABOUTME: UI surfaces subscribe to change notifications instead of sharing a mutable global store
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

//! Streak event notifications
//!
//! Multiple surfaces (dashboard, plan editor, widgets) display the same
//! streak and goal state. Rather than a monolithic shared store, each
//! surface subscribes to a per-user broadcast channel and re-reads from the
//! record store when an event arrives. Publishing to a user with no
//! subscribers is not an error; events are fire-and-forget.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::StreakRecord;
use crate::streak::{StreakTransition, StreakUpdate};

/// A change worth telling subscribers about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreakEvent {
    /// Every goal reached completion today (fires before the check-in)
    GoalsCompleted,
    /// First-ever check-in recorded
    StreakStarted {
        /// The stored record after the check-in
        record: StreakRecord,
    },
    /// Streak grew by one day
    StreakExtended {
        /// The stored record after the check-in
        record: StreakRecord,
    },
    /// Streak reset to day one after a missed day
    StreakReset {
        /// The stored record after the check-in
        record: StreakRecord,
    },
}

impl StreakEvent {
    /// Map a state-machine result onto an event, if the transition is one
    /// subscribers care about (no-ops produce nothing)
    #[must_use]
    pub const fn from_update(update: &StreakUpdate) -> Option<Self> {
        match update.transition {
            StreakTransition::Started => Some(Self::StreakStarted {
                record: update.record,
            }),
            StreakTransition::Extended => Some(Self::StreakExtended {
                record: update.record,
            }),
            StreakTransition::Reset => Some(Self::StreakReset {
                record: update.record,
            }),
            StreakTransition::AlreadyCheckedIn | StreakTransition::ClockSkew => None,
        }
    }
}

/// Per-user broadcast hub for streak events
#[derive(Debug, Clone)]
pub struct StreakNotifier {
    channels: Arc<DashMap<Uuid, broadcast::Sender<StreakEvent>>>,
    capacity: usize,
}

impl StreakNotifier {
    /// Create a notifier whose per-user channels buffer `capacity` events
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to a user's events. The channel is created on first use and
    /// lives for the notifier's lifetime.
    #[must_use]
    pub fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<StreakEvent> {
        self.channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish an event to a user's subscribers. Returns how many receivers
    /// observed it; zero (nobody listening) is a normal outcome.
    pub fn publish(&self, user_id: Uuid, event: &StreakEvent) -> usize {
        let Some(sender) = self.channels.get(&user_id) else {
            debug!(%user_id, "no subscribers registered, dropping event");
            return 0;
        };
        match sender.send(event.clone()) {
            Ok(delivered) => delivered,
            Err(_) => {
                debug!(%user_id, "all subscribers gone, dropping event");
                0
            }
        }
    }

    /// Number of users with a registered channel (for monitoring)
    #[must_use]
    pub fn active_users(&self) -> usize {
        self.channels.len()
    }
}

impl Default for StreakNotifier {
    fn default() -> Self {
        Self::new(crate::constants::notifications::BROADCAST_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn update(transition: StreakTransition, count: u32) -> StreakUpdate {
        StreakUpdate {
            record: StreakRecord {
                streak_count: count,
                last_check_in: NaiveDate::from_ymd_opt(2024, 1, 10),
            },
            transition,
        }
    }

    #[test]
    fn test_no_event_for_no_op_transitions() {
        assert!(StreakEvent::from_update(&update(StreakTransition::AlreadyCheckedIn, 5)).is_none());
        assert!(StreakEvent::from_update(&update(StreakTransition::ClockSkew, 5)).is_none());
        assert!(StreakEvent::from_update(&update(StreakTransition::Extended, 6)).is_some());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let notifier = StreakNotifier::new(8);
        let user = Uuid::new_v4();
        let mut rx = notifier.subscribe(user);

        let event = StreakEvent::from_update(&update(StreakTransition::Started, 1)).unwrap();
        assert_eq!(notifier.publish(user, &event), 1);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_quiet() {
        let notifier = StreakNotifier::new(8);
        assert_eq!(notifier.publish(Uuid::new_v4(), &StreakEvent::GoalsCompleted), 0);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let notifier = StreakNotifier::new(8);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut alice_rx = notifier.subscribe(alice);
        let mut bob_rx = notifier.subscribe(bob);

        notifier.publish(alice, &StreakEvent::GoalsCompleted);
        assert_eq!(alice_rx.recv().await.unwrap(), StreakEvent::GoalsCompleted);
        assert!(bob_rx.try_recv().is_err());
    }
}
