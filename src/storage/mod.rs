//! # Storage
//!
//! User records and the append-only adherence log, behind capability
//! traits so backends stay interchangeable. Two implementations ship:
//! `sqlite` (durable) and `memory` (ephemeral, used by tests and dry
//! runs). The backend is selected by [`Config`] at startup.
//!
//! The log is append-only: nothing in this service updates or deletes an
//! entry once it is recorded.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Split the single database type into UserStore/LogStore traits
//!   with sqlite and in-memory backends
//! - 1.0.0: Initial sqlite-only release

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::Config;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Log action recorded when a user takes their medication. The only
/// action the reminder engine checks when deciding to stay quiet.
pub const ACTION_MEDICATION: &str = "medication";

/// Log action recorded when a user drinks a glass of water.
pub const ACTION_WATER: &str = "water";

/// Timestamp format used in durable storage and CLI output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registered user, as the reminder core sees one.
///
/// Account management (passwords, sessions, profile pages) lives outside
/// this service; this is the read-only snapshot a sweep works from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub med_name: String,
    pub dosage: String,
    /// Daily dose time as 24-hour `HH:MM`, local to the process.
    pub med_time: String,
    /// Daily hydration goal in glasses.
    pub water_goal: Option<i64>,
}

/// One append-only adherence log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub user_id: String,
    pub action: String,
    pub timestamp: NaiveDateTime,
}

/// Read/write access to registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Snapshot of all registered users, ordered by name.
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Registers a new user. Fails if the email is already taken.
    async fn add_user(&self, user: &User) -> Result<()>;

    /// Replaces an existing user's profile, matched by id.
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Read/append access to the adherence log.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Appends one entry. Entries are never updated or removed.
    async fn record(&self, entry: &LogEntry) -> Result<()>;

    /// All entries for a user, oldest first.
    async fn entries_for(&self, user_id: &str) -> Result<Vec<LogEntry>>;

    /// Whether the user has logged medication since local midnight.
    /// Re-derives "today" on every call and is idempotent between writes.
    async fn has_taken_today(&self, user_id: &str) -> Result<bool>;

    /// Number of entries with `action` since local midnight.
    async fn count_today(&self, user_id: &str, action: &str) -> Result<u32>;
}

/// Opens the configured backend and hands it back under both capability
/// traits.
pub fn open_stores(config: &Config) -> Result<(Arc<dyn UserStore>, Arc<dyn LogStore>)> {
    match config.storage_backend.as_str() {
        "sqlite" => {
            let store = Arc::new(SqliteStore::open(&config.database_path)?);
            let users: Arc<dyn UserStore> = store.clone();
            let logs: Arc<dyn LogStore> = store;
            Ok((users, logs))
        }
        "memory" => {
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let logs: Arc<dyn LogStore> = store;
            Ok((users, logs))
        }
        other => bail!("unknown storage backend {other:?} (expected \"sqlite\" or \"memory\")"),
    }
}
