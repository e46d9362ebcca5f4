use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Seam between the check cycle and HTTP. Callers treat an error as "page
/// absent" and move on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// One GET per URL with a configurable user-agent and timeout. Non-2xx
/// statuses surface as errors.
pub struct PageFetcher {
    client: Client,
    user_agent: String,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
