//! Resend transactional email provider.
//!
//! One JSON POST per message; the API rejects with a non-2xx status and
//! a text body describing the problem.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use super::Notifier;

const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub struct ResendNotifier {
    client: reqwest::Client,
    api_key: String,
    from: String,
    api_url: String,
}

impl ResendNotifier {
    pub fn new(api_key: String, from: String) -> Self {
        ResendNotifier {
            client: reqwest::Client::new(),
            api_key,
            from,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn notify(&self, to_email: &str, subject: &str, body: &str) -> Result<()> {
        let request = SendRequest {
            from: &self.from,
            to: to_email,
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("resend request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("resend returned {status}: {detail}");
        }

        debug!("Resend accepted message to {to_email}");
        Ok(())
    }
}
