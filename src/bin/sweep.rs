//! Reminder sweep entrypoint.
//!
//! Meant to be run by an external scheduler (cron or similar) with no
//! arguments. Exits 0 once the sweep completes, even when individual
//! sends failed along the way; exits non-zero only when setup itself
//! fails (bad configuration or an unreadable user list).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;

use dosewatch::core::Config;
use dosewatch::features::reminders::{ReminderEngine, SweepDriver};
use dosewatch::{notify, storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting dosewatch reminder sweep...");

    let (users, logs) = storage::open_stores(&config)?;
    let notifier = notify::from_config(&config)?;

    let engine = Arc::new(
        ReminderEngine::new(logs, notifier)
            .with_pace(Duration::from_secs(config.reminder_pace_secs)),
    );
    let driver = SweepDriver::new(users, engine);

    let summary = driver.run().await?;

    info!(
        "Sweep finished: {} of {} user(s) needed attention",
        summary.checked - summary.satisfied - summary.skipped,
        summary.checked
    );

    Ok(())
}
