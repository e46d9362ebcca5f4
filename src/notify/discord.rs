use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::agent::NotificationAgent;
use crate::error::Result;

/// Delivers messages as a `content` form field POSTed to a Discord webhook.
pub struct DiscordAgent {
    name: String,
    webhook_url: String,
    client: Client,
}

impl DiscordAgent {
    pub fn new(webhook_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            webhook_url: webhook_url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl NotificationAgent for DiscordAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .form(&[("content", message)])
            .send()
            .await?;
        response.error_for_status()?;
        debug!("Delivered webhook message via {}", self.name);
        Ok(())
    }
}
