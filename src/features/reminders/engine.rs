//! Per-user reminder decision cycle.
//!
//! For one user snapshot and a fixed sweep-start `now`, decides whether
//! to remind, how many times, and when to stop. Adherence is re-checked
//! before every send; a medication log entry is the only cancellation
//! signal there is.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::features::schedule;
use crate::notify::Notifier;
use crate::storage::{LogStore, User};

/// Default suspension between countdown reminders.
pub const DEFAULT_PACE: Duration = Duration::from_secs(3600);

/// What one decision cycle did for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Medication was already logged today; nothing was sent.
    Satisfied,
    /// The configured dose time failed to parse; user skipped.
    InvalidTime,
    /// The hourly countdown ran. `interrupted` means a medication log
    /// entry stopped it before the hour-1 reminder.
    Countdown { sent: u32, interrupted: bool },
    /// One final "time to take it now" reminder went out.
    FinalSent,
}

pub struct ReminderEngine {
    logs: Arc<dyn LogStore>,
    notifier: Arc<dyn Notifier>,
    pace: Duration,
}

impl ReminderEngine {
    pub fn new(logs: Arc<dyn LogStore>, notifier: Arc<dyn Notifier>) -> Self {
        ReminderEngine {
            logs,
            notifier,
            pace: DEFAULT_PACE,
        }
    }

    /// Overrides the countdown suspension. Tests run at millisecond pace;
    /// production keeps the one-hour default.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Runs one full decision cycle for `user`, with timing measured from
    /// `now` (the sweep snapshot).
    ///
    /// Errors only on log-store failure, in which case the caller skips
    /// the user for this sweep rather than guessing at adherence.
    pub async fn run_cycle(&self, user: &User, now: NaiveDateTime) -> Result<CycleOutcome> {
        let med_time = match schedule::parse_medication_time(&user.med_time) {
            Ok(time) => time,
            Err(e) => {
                warn!("Skipping {}: {e:#}", user.name);
                return Ok(CycleOutcome::InvalidTime);
            }
        };

        if self.logs.has_taken_today(&user.id).await? {
            info!("{} already took medication. Skipping reminders.", user.name);
            return Ok(CycleOutcome::Satisfied);
        }

        let dose = schedule::upcoming_dose(med_time, now);
        let hours_until = dose.whole_hours();
        debug!(
            "{}: next dose at {}, {} whole hour(s) away",
            user.name, dose.at, hours_until
        );

        if hours_until > 0 {
            self.run_countdown(user, hours_until).await
        } else if self.logs.has_taken_today(&user.id).await? {
            Ok(CycleOutcome::Satisfied)
        } else {
            self.send_final(user).await;
            Ok(CycleOutcome::FinalSent)
        }
    }

    /// One reminder per remaining whole hour, counting down to 1. Stops
    /// the moment adherence shows up. Never emits an hour-0 step; that
    /// slot belongs to the final reminder of a later cycle.
    async fn run_countdown(&self, user: &User, hours_until: i64) -> Result<CycleOutcome> {
        let mut sent = 0u32;
        for hour in (1..=hours_until).rev() {
            if self.logs.has_taken_today(&user.id).await? {
                info!("{} took their medication, stopping reminders.", user.name);
                return Ok(CycleOutcome::Countdown {
                    sent,
                    interrupted: true,
                });
            }

            let body = format!(
                "Hi {}, your next medication ({} - {}) is scheduled for {}.\n\n\
                 {} hour(s) left. Please prepare to take your medication on time!",
                user.name, user.med_name, user.dosage, user.med_time, hour
            );
            self.send(user, "⏰ Medication Reminder", &body).await;
            sent += 1;

            debug!(
                "Waiting {}s before next reminder for {}",
                self.pace.as_secs(),
                user.name
            );
            tokio::time::sleep(self.pace).await;
        }

        Ok(CycleOutcome::Countdown {
            sent,
            interrupted: false,
        })
    }

    async fn send_final(&self, user: &User) {
        let body = format!(
            "Hi {}!\n\nIt's time to take your {} ({}).\n\
             Please stay consistent with your routine.",
            user.name, user.med_name, user.dosage
        );
        self.send(user, "💊 Time to Take Your Medication!", &body).await;
    }

    /// Best-effort delivery. A failed send is logged and otherwise
    /// treated as issued; there is no retry or resend state.
    async fn send(&self, user: &User, subject: &str, body: &str) {
        match self.notifier.notify(&user.email, subject, body).await {
            Ok(()) => info!("Email sent to {}", user.email),
            Err(e) => warn!("Failed to send email to {}: {e:#}", user.email),
        }
    }
}
