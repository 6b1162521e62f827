//! Sweep driver: applies the reminder engine to every registered user.
//!
//! Each user runs on an independent task so one user's hourly countdown
//! never delays another's. The user list and `now` are snapshotted once
//! at sweep start; adherence queries re-read live state throughout.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use log::{error, info};

use super::engine::{CycleOutcome, ReminderEngine};
use crate::storage::UserStore;

/// Aggregated result of one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    /// Users in the sweep snapshot.
    pub checked: usize,
    /// Users who had already logged medication.
    pub satisfied: usize,
    /// Users skipped over a bad dose time or a store failure.
    pub skipped: usize,
    /// Reminder emails issued across all users.
    pub reminders_sent: u64,
}

pub struct SweepDriver {
    users: Arc<dyn UserStore>,
    engine: Arc<ReminderEngine>,
}

impl SweepDriver {
    pub fn new(users: Arc<dyn UserStore>, engine: Arc<ReminderEngine>) -> Self {
        SweepDriver { users, engine }
    }

    /// Runs one full sweep. Fails only when the user list cannot be
    /// read; per-user failures are logged and counted as skipped.
    pub async fn run(&self) -> Result<SweepSummary> {
        let users = self.users.list_users().await.context("cannot read user list")?;
        let now = Local::now().naive_local();
        info!("Starting reminder sweep for {} user(s)", users.len());

        let mut handles = Vec::with_capacity(users.len());
        for user in users {
            let engine = self.engine.clone();
            handles.push(tokio::spawn(async move {
                let name = user.name.clone();
                (name, engine.run_cycle(&user, now).await)
            }));
        }

        let mut summary = SweepSummary {
            checked: handles.len(),
            ..Default::default()
        };
        for handle in handles {
            match handle.await {
                Ok((_, Ok(outcome))) => match outcome {
                    CycleOutcome::Satisfied => summary.satisfied += 1,
                    CycleOutcome::InvalidTime => summary.skipped += 1,
                    CycleOutcome::Countdown { sent, .. } => {
                        summary.reminders_sent += u64::from(sent)
                    }
                    CycleOutcome::FinalSent => summary.reminders_sent += 1,
                },
                Ok((name, Err(e))) => {
                    error!("Skipping {name} for this sweep: {e:#}");
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!("Reminder task failed: {e}");
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "Sweep complete: {} checked, {} satisfied, {} skipped, {} reminder(s) sent",
            summary.checked, summary.satisfied, summary.skipped, summary.reminders_sent
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notifier;
    use crate::storage::{LogEntry, LogStore, MemoryStore, User, ACTION_MEDICATION};
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::{Duration as TimeDelta, Local};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct CountingNotifier {
        sent: AtomicU64,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BrokenUserStore;

    #[async_trait]
    impl UserStore for BrokenUserStore {
        async fn list_users(&self) -> Result<Vec<User>> {
            bail!("connection refused")
        }
        async fn get_user(&self, _id: &str) -> Result<Option<User>> {
            bail!("connection refused")
        }
        async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>> {
            bail!("connection refused")
        }
        async fn add_user(&self, _user: &User) -> Result<()> {
            bail!("connection refused")
        }
        async fn update_user(&self, _user: &User) -> Result<()> {
            bail!("connection refused")
        }
    }

    fn user(id: &str, name: &str, med_time: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            phone: None,
            med_name: "Lisinopril".to_string(),
            dosage: "10mg".to_string(),
            med_time: med_time.to_string(),
            water_goal: None,
        }
    }

    #[tokio::test]
    async fn test_sweep_aggregates_independent_outcomes() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(CountingNotifier {
            sent: AtomicU64::new(0),
        });

        // One satisfied user, one with an unparseable dose time, one due
        // within the hour.
        let now = Local::now().naive_local();
        let due_time = (now + TimeDelta::minutes(20)).time().format("%H:%M").to_string();
        store.add_user(&user("a", "Ada", "08:00")).await.unwrap();
        store.add_user(&user("b", "Ben", "whenever")).await.unwrap();
        store.add_user(&user("c", "Cal", &due_time)).await.unwrap();
        store
            .record(&LogEntry {
                user_id: "a".to_string(),
                action: ACTION_MEDICATION.to_string(),
                timestamp: now,
            })
            .await
            .unwrap();

        let engine = Arc::new(
            ReminderEngine::new(store.clone(), notifier.clone())
                .with_pace(Duration::from_millis(1)),
        );
        let summary = SweepDriver::new(store, engine).run().await.unwrap();

        assert_eq!(summary.checked, 3);
        assert_eq!(summary.satisfied, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.reminders_sent, 1);
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreadable_user_list_is_fatal() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(CountingNotifier {
            sent: AtomicU64::new(0),
        });
        let engine = Arc::new(ReminderEngine::new(store, notifier));

        let result = SweepDriver::new(Arc::new(BrokenUserStore), engine).run().await;
        assert!(result.is_err());
    }
}
