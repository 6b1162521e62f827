//! SQLite-backed storage.
//!
//! Opens a short-lived connection per operation: every call is a handful
//! of statements, and it keeps the store freely shareable across tasks
//! without holding a connection-wide lock. The schema is created on first
//! open.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use sqlite::{Connection, State, Statement, Value};

use super::{LogEntry, LogStore, User, UserStore, ACTION_MEDICATION, TIMESTAMP_FORMAT};

pub struct SqliteStore {
    path: String,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and ensures the
    /// schema exists.
    pub fn open(path: &str) -> Result<Self> {
        let connection =
            sqlite::open(path).with_context(|| format!("failed to open database at {path}"))?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                phone TEXT,
                med_name TEXT NOT NULL,
                dosage TEXT NOT NULL,
                med_time TEXT NOT NULL,
                water_goal INTEGER
            )",
        )?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                action TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
        )?;

        Ok(SqliteStore {
            path: path.to_string(),
        })
    }

    fn connect(&self) -> Result<Connection> {
        sqlite::open(&self.path)
            .with_context(|| format!("failed to open database at {}", self.path))
    }

    fn read_user(statement: &Statement) -> Result<User> {
        Ok(User {
            id: statement.read::<String, _>("id")?,
            name: statement.read::<String, _>("name")?,
            email: statement.read::<String, _>("email")?,
            phone: statement.read::<Option<String>, _>("phone")?,
            med_name: statement.read::<String, _>("med_name")?,
            dosage: statement.read::<String, _>("dosage")?,
            med_time: statement.read::<String, _>("med_time")?,
            water_goal: statement.read::<Option<i64>, _>("water_goal")?,
        })
    }

    /// Start of the current local calendar day, in storage format. The
    /// adherence window runs from this instant to now.
    fn today_floor() -> String {
        Local::now()
            .date_naive()
            .format("%Y-%m-%d 00:00:00")
            .to_string()
    }

    fn count_since(&self, user_id: &str, action: &str, floor: &str) -> Result<u32> {
        let connection = self.connect()?;
        let mut statement = connection.prepare(
            "SELECT COUNT(*) FROM logs WHERE user_id = ? AND action = ? AND timestamp >= ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, action))?;
        statement.bind((3, floor))?;

        let mut count = 0i64;
        if let State::Row = statement.next()? {
            count = statement.read::<i64, _>(0)?;
        }
        Ok(count as u32)
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let connection = self.connect()?;
        let mut statement = connection.prepare("SELECT * FROM users ORDER BY name")?;

        let mut users = Vec::new();
        while let State::Row = statement.next()? {
            users.push(Self::read_user(&statement)?);
        }
        Ok(users)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let connection = self.connect()?;
        let mut statement = connection.prepare("SELECT * FROM users WHERE id = ?")?;
        statement.bind((1, id))?;

        if let State::Row = statement.next()? {
            Ok(Some(Self::read_user(&statement)?))
        } else {
            Ok(None)
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let connection = self.connect()?;
        let mut statement = connection.prepare("SELECT * FROM users WHERE email = ?")?;
        statement.bind((1, email))?;

        if let State::Row = statement.next()? {
            Ok(Some(Self::read_user(&statement)?))
        } else {
            Ok(None)
        }
    }

    async fn add_user(&self, user: &User) -> Result<()> {
        let connection = self.connect()?;
        let mut statement = connection.prepare(
            "INSERT INTO users (id, name, email, phone, med_name, dosage, med_time, water_goal)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        let phone: Value = match &user.phone {
            Some(phone) => phone.as_str().into(),
            None => Value::Null,
        };
        let water_goal: Value = match user.water_goal {
            Some(goal) => goal.into(),
            None => Value::Null,
        };
        statement.bind((1, user.id.as_str()))?;
        statement.bind((2, user.name.as_str()))?;
        statement.bind((3, user.email.as_str()))?;
        statement.bind((4, phone))?;
        statement.bind((5, user.med_name.as_str()))?;
        statement.bind((6, user.dosage.as_str()))?;
        statement.bind((7, user.med_time.as_str()))?;
        statement.bind((8, water_goal))?;

        while let State::Row = statement.next()? {}
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let connection = self.connect()?;
        let mut statement = connection.prepare(
            "UPDATE users SET name = ?, email = ?, phone = ?, med_name = ?,
             dosage = ?, med_time = ?, water_goal = ? WHERE id = ?",
        )?;
        let phone: Value = match &user.phone {
            Some(phone) => phone.as_str().into(),
            None => Value::Null,
        };
        let water_goal: Value = match user.water_goal {
            Some(goal) => goal.into(),
            None => Value::Null,
        };
        statement.bind((1, user.name.as_str()))?;
        statement.bind((2, user.email.as_str()))?;
        statement.bind((3, phone))?;
        statement.bind((4, user.med_name.as_str()))?;
        statement.bind((5, user.dosage.as_str()))?;
        statement.bind((6, user.med_time.as_str()))?;
        statement.bind((7, water_goal))?;
        statement.bind((8, user.id.as_str()))?;

        while let State::Row = statement.next()? {}
        Ok(())
    }
}

#[async_trait]
impl LogStore for SqliteStore {
    async fn record(&self, entry: &LogEntry) -> Result<()> {
        let connection = self.connect()?;
        let mut statement = connection
            .prepare("INSERT INTO logs (user_id, action, timestamp) VALUES (?, ?, ?)")?;
        let timestamp = entry.timestamp.format(TIMESTAMP_FORMAT).to_string();
        statement.bind((1, entry.user_id.as_str()))?;
        statement.bind((2, entry.action.as_str()))?;
        statement.bind((3, timestamp.as_str()))?;

        while let State::Row = statement.next()? {}
        Ok(())
    }

    async fn entries_for(&self, user_id: &str) -> Result<Vec<LogEntry>> {
        let connection = self.connect()?;
        let mut statement = connection.prepare(
            "SELECT user_id, action, timestamp FROM logs WHERE user_id = ? ORDER BY timestamp",
        )?;
        statement.bind((1, user_id))?;

        let mut entries = Vec::new();
        while let State::Row = statement.next()? {
            let raw = statement.read::<String, _>("timestamp")?;
            let timestamp = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
                .with_context(|| format!("malformed log timestamp {raw:?}"))?;
            entries.push(LogEntry {
                user_id: statement.read::<String, _>("user_id")?,
                action: statement.read::<String, _>("action")?,
                timestamp,
            });
        }
        Ok(entries)
    }

    async fn has_taken_today(&self, user_id: &str) -> Result<bool> {
        let count = self.count_since(user_id, ACTION_MEDICATION, &Self::today_floor())?;
        Ok(count > 0)
    }

    async fn count_today(&self, user_id: &str, action: &str) -> Result<u32> {
        self.count_since(user_id, action, &Self::today_floor())
    }
}
