//! # Feature: Reminders
//!
//! The reminder decision engine and the sweep driver that applies it to
//! every registered user.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: One independent task per user, so a slow countdown no longer
//!   blocks the rest of the sweep
//! - 1.0.0: Initial sequential sweep

pub mod engine;
pub mod sweep;

pub use engine::{CycleOutcome, ReminderEngine};
pub use sweep::{SweepDriver, SweepSummary};
