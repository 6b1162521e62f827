//! In-memory storage backed by `DashMap`.
//!
//! Ephemeral backend with the same window semantics as the durable
//! store. Used by the test suite and by `STORAGE_BACKEND=memory` dry
//! runs.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Local;
use dashmap::DashMap;

use super::{LogEntry, LogStore, User, UserStore, ACTION_MEDICATION};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    logs: DashMap<String, Vec<LogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|user| user.value().clone()).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|user| user.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|user| user.value().email == email)
            .map(|user| user.value().clone()))
    }

    async fn add_user(&self, user: &User) -> Result<()> {
        if self.users.iter().any(|u| u.value().email == user.email) {
            bail!("email {} is already registered", user.email);
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        if !self.users.contains_key(&user.id) {
            bail!("no user with id {}", user.id);
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn record(&self, entry: &LogEntry) -> Result<()> {
        self.logs
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, user_id: &str) -> Result<Vec<LogEntry>> {
        let mut entries = self
            .logs
            .get(user_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default();
        entries.sort_by_key(|entry| entry.timestamp);
        Ok(entries)
    }

    async fn has_taken_today(&self, user_id: &str) -> Result<bool> {
        Ok(self.count_today(user_id, ACTION_MEDICATION).await? > 0)
    }

    async fn count_today(&self, user_id: &str, action: &str) -> Result<u32> {
        let today = Local::now().date_naive();
        let count = self
            .logs
            .get(user_id)
            .map(|entries| {
                entries
                    .value()
                    .iter()
                    .filter(|entry| entry.action == action && entry.timestamp.date() == today)
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u32)
    }
}
