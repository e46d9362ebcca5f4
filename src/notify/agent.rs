use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// An external delivery channel registered with the notification service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationAgent: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver a formatted text message to the external endpoint.
    async fn send(&self, message: &str) -> Result<()>;
}
