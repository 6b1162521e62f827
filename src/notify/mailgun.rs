//! Mailgun transactional email provider.
//!
//! Form-encoded POST against the messages endpoint for the configured
//! sending domain, authenticated with HTTP basic auth (user "api").

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;

use super::Notifier;

const DEFAULT_BASE_URL: &str = "https://api.mailgun.net";

pub struct MailgunNotifier {
    client: reqwest::Client,
    api_key: String,
    domain: String,
    from: String,
    base_url: String,
}

impl MailgunNotifier {
    pub fn new(api_key: String, domain: String, from: String) -> Self {
        MailgunNotifier {
            client: reqwest::Client::new(),
            api_key,
            domain,
            from,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/{}/messages", self.base_url, self.domain)
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn notify(&self, to_email: &str, subject: &str, body: &str) -> Result<()> {
        let form = [
            ("from", self.from.as_str()),
            ("to", to_email),
            ("subject", subject),
            ("text", body),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .context("mailgun request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("mailgun returned {status}: {detail}");
        }

        debug!("Mailgun accepted message to {to_email}");
        Ok(())
    }
}
