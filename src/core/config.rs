//! Environment-driven configuration.
//!
//! Read once at startup via [`Config::from_env`] and passed into
//! components explicitly; nothing reads the environment after
//! construction. Provider credentials stay optional here and are
//! validated where the provider is built, so a console-mail dry run
//! needs no mail account at all.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Added REMINDER_PACE_SECS override for fast end-to-end runs
//! - 1.0.0: Initial release

use anyhow::{Context, Result};
use std::env;

/// Runtime configuration for the sweep and CLI binaries.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend: `sqlite` or `memory`.
    pub storage_backend: String,
    /// Path of the sqlite database file.
    pub database_path: String,
    /// Mail provider: `resend`, `mailgun`, or `console`.
    pub mail_provider: String,
    /// Sender address for outgoing mail.
    pub from_email: Option<String>,
    pub resend_api_key: Option<String>,
    pub mailgun_api_key: Option<String>,
    pub mailgun_domain: Option<String>,
    /// Seconds between countdown reminders. One hour in production.
    pub reminder_pace_secs: u64,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, applying defaults
    /// for everything that is not security-sensitive.
    pub fn from_env() -> Result<Config> {
        let reminder_pace_secs = match env::var("REMINDER_PACE_SECS") {
            Ok(value) => value
                .parse()
                .context("REMINDER_PACE_SECS must be an integer number of seconds")?,
            Err(_) => 3600,
        };

        Ok(Config {
            storage_backend: env::var("STORAGE_BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "dosewatch.db".to_string()),
            mail_provider: env::var("MAIL_PROVIDER").unwrap_or_else(|_| "console".to_string()),
            from_email: env::var("FROM_EMAIL").ok(),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            mailgun_api_key: env::var("MAILGUN_API_KEY").ok(),
            mailgun_domain: env::var("MAILGUN_DOMAIN").ok(),
            reminder_pace_secs,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
