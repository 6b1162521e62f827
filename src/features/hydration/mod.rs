//! # Feature: Hydration
//!
//! Daily water intake against the user's configured goal. Counts `water`
//! log entries in the same calendar-day window the reminder engine uses
//! for adherence.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: true

use std::sync::Arc;

use anyhow::Result;

use crate::storage::{LogStore, User, ACTION_WATER};

/// Today's intake for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationStatus {
    /// Glasses logged since local midnight.
    pub logged: u32,
    /// Configured daily goal, if any.
    pub goal: Option<i64>,
}

impl HydrationStatus {
    pub fn goal_met(&self) -> bool {
        match self.goal {
            Some(goal) => i64::from(self.logged) >= goal,
            None => false,
        }
    }
}

pub struct HydrationTracker {
    logs: Arc<dyn LogStore>,
}

impl HydrationTracker {
    pub fn new(logs: Arc<dyn LogStore>) -> Self {
        HydrationTracker { logs }
    }

    pub async fn status(&self, user: &User) -> Result<HydrationStatus> {
        let logged = self.logs.count_today(&user.id, ACTION_WATER).await?;
        Ok(HydrationStatus {
            logged,
            goal: user.water_goal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LogEntry, MemoryStore};
    use chrono::{Duration, Local};

    fn user_with_goal(goal: Option<i64>) -> User {
        User {
            id: "u1".to_string(),
            name: "Alisha".to_string(),
            email: "alisha@example.com".to_string(),
            phone: None,
            med_name: "Ibuprofen".to_string(),
            dosage: "200mg".to_string(),
            med_time: "08:00".to_string(),
            water_goal: goal,
        }
    }

    async fn log_water(store: &MemoryStore, timestamp: chrono::NaiveDateTime) {
        store
            .record(&LogEntry {
                user_id: "u1".to_string(),
                action: ACTION_WATER.to_string(),
                timestamp,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_goal_met_counts_todays_glasses_only() {
        let store = Arc::new(MemoryStore::new());
        let tracker = HydrationTracker::new(store.clone());
        let user = user_with_goal(Some(3));
        let now = Local::now().naive_local();

        // Yesterday's glasses never count toward today
        log_water(&store, now - Duration::days(1)).await;
        log_water(&store, now).await;
        log_water(&store, now).await;

        let status = tracker.status(&user).await.unwrap();
        assert_eq!(status.logged, 2);
        assert!(!status.goal_met());

        log_water(&store, now).await;
        let status = tracker.status(&user).await.unwrap();
        assert_eq!(status.logged, 3);
        assert!(status.goal_met());
    }

    #[tokio::test]
    async fn test_no_goal_is_never_met() {
        let store = Arc::new(MemoryStore::new());
        let tracker = HydrationTracker::new(store.clone());
        let user = user_with_goal(None);

        log_water(&store, Local::now().naive_local()).await;
        let status = tracker.status(&user).await.unwrap();
        assert_eq!(status.logged, 1);
        assert!(!status.goal_met());
    }
}
