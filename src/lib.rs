// ABOUTME: Main library entry point for the Stride daily goal and streak tracking engine
// ABOUTME: Exposes the pure streak engine, record store abstraction, and service orchestration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Stride Labs

#![deny(unsafe_code)]

//! # Stride Tracker
//!
//! Core engine for a fitness-goal-tracking service: users hold three daily
//! goals (distance, time, calories) and a consecutive-day streak that
//! advances only on days every goal is completed.
//!
//! ## Features
//!
//! - **Pure streak engine**: the daily check-in state machine is a pure
//!   function of `(record, now)`, directly unit testable
//! - **Pluggable record store**: persistence behind an async trait with an
//!   in-memory reference implementation
//! - **Goal suggestions**: daily targets derived from recent wearable
//!   summaries
//! - **Change notifications**: per-user broadcast events instead of shared
//!   mutable state
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stride_tracker::config::TrackerConfig;
//! use stride_tracker::errors::AppResult;
//! use stride_tracker::models::GoalMetric;
//! use stride_tracker::service::StreakService;
//! use stride_tracker::store::InMemoryStore;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let service = StreakService::new(Arc::new(InMemoryStore::new()), TrackerConfig::default());
//!     let user = Uuid::new_v4();
//!
//!     service.initialize(user).await?;
//!     let snapshot = service.record_progress(user, GoalMetric::Distance, 2.0).await?;
//!     println!("distance at {}%", snapshot.progress.distance);
//!     Ok(())
//! }
//! ```

/// Injectable clock collaborator
pub mod clock;

/// Runtime configuration and the day-boundary timezone policy
pub mod config;

/// Application constants and preset goal values
pub mod constants;

/// Unified error handling with standard error codes
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Core data models for goals, streaks, and wearable summaries
pub mod models;

/// Per-user change notification broadcasting
pub mod notifications;

/// Domain service orchestrating engine, store, clock, and notifier
pub mod service;

/// Record store abstraction with pluggable backends
pub mod store;

/// Pure streak engine: progress evaluation and the check-in state machine
pub mod streak;

/// Goal suggestion from wearable data
pub mod suggestions;
