//! # Features
//!
//! Feature modules of the reminder service. Each module owns one concern
//! and receives its collaborators explicitly.

pub mod hydration;
pub mod reminders;
pub mod schedule;

// Re-export commonly used items
pub use hydration::{HydrationStatus, HydrationTracker};
pub use reminders::{CycleOutcome, ReminderEngine, SweepDriver, SweepSummary};
pub use schedule::{next_occurrence, parse_medication_time, upcoming_dose, UpcomingDose};
