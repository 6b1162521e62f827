//! # Notification
//!
//! Email delivery behind a capability trait. Delivery is best-effort:
//! callers log failures and move on, and nothing in here retries.
//!
//! Providers ship for the Resend and Mailgun transactional APIs, plus a
//! `console` transport that logs instead of sending. The provider is
//! selected by [`Config`] at startup; missing credentials for the
//! selected provider abort startup rather than failing per send.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Added Mailgun provider
//! - 1.1.0: Added console transport for credential-less dry runs
//! - 1.0.0: Initial Resend-only release

pub mod console;
pub mod mailgun;
pub mod resend;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::core::Config;

pub use console::ConsoleNotifier;
pub use mailgun::MailgunNotifier;
pub use resend::ResendNotifier;

/// Something that can deliver one plain-text email to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, to_email: &str, subject: &str, body: &str) -> Result<()>;
}

/// Builds the configured provider.
pub fn from_config(config: &Config) -> Result<Arc<dyn Notifier>> {
    match config.mail_provider.as_str() {
        "resend" => {
            let api_key = config
                .resend_api_key
                .clone()
                .context("RESEND_API_KEY must be set when MAIL_PROVIDER=resend")?;
            let from = config
                .from_email
                .clone()
                .context("FROM_EMAIL must be set when MAIL_PROVIDER=resend")?;
            Ok(Arc::new(ResendNotifier::new(api_key, from)))
        }
        "mailgun" => {
            let api_key = config
                .mailgun_api_key
                .clone()
                .context("MAILGUN_API_KEY must be set when MAIL_PROVIDER=mailgun")?;
            let domain = config
                .mailgun_domain
                .clone()
                .context("MAILGUN_DOMAIN must be set when MAIL_PROVIDER=mailgun")?;
            let from = config
                .from_email
                .clone()
                .context("FROM_EMAIL must be set when MAIL_PROVIDER=mailgun")?;
            Ok(Arc::new(MailgunNotifier::new(api_key, domain, from)))
        }
        "console" => Ok(Arc::new(ConsoleNotifier)),
        other => bail!(
            "unknown mail provider {other:?} (expected \"resend\", \"mailgun\", or \"console\")"
        ),
    }
}
