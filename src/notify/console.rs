//! Console transport: logs messages instead of sending them.
//!
//! The default provider, so a fresh checkout can run a full sweep with
//! no mail credentials configured.

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use super::Notifier;

pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, to_email: &str, subject: &str, body: &str) -> Result<()> {
        info!("[mail] to: {to_email}");
        info!("[mail] subject: {subject}");
        for line in body.lines() {
            info!("[mail]   {line}");
        }
        Ok(())
    }
}
