// Core layer - shared configuration
pub mod core;

// Features layer - scheduling, reminders, hydration
pub mod features;

// Infrastructure - persistence and email delivery
pub mod notify;
pub mod storage;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items
pub use features::{
    // Hydration
    HydrationStatus, HydrationTracker,
    // Reminders
    CycleOutcome, ReminderEngine, SweepDriver, SweepSummary,
    // Schedule
    UpcomingDose,
};

// Re-export capability seams
pub use notify::Notifier;
pub use storage::{LogEntry, LogStore, User, UserStore};
