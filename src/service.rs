use tracing::{debug, error, info};

use crate::error::Result;
use crate::history::NotificationHistory;
use crate::notify::NotificationAgent;

/// Fans messages out to registered agents, deduplicated by identifier
/// against the notification history.
pub struct NotificationService {
    history: Box<dyn NotificationHistory>,
    agents: Vec<Box<dyn NotificationAgent>>,
}

impl NotificationService {
    pub fn new(history: Box<dyn NotificationHistory>) -> Self {
        Self {
            history,
            agents: Vec::new(),
        }
    }

    pub fn register_agent(&mut self, agent: Box<dyn NotificationAgent>) {
        self.agents.push(agent);
    }

    pub fn has_been_notified(&self, identifier: &str) -> bool {
        self.history.has_been_notified(identifier)
    }

    /// Send `message` through every registered agent unless `identifier` has
    /// already been notified.
    ///
    /// Dedup keys on the identifier alone: it is recorded exactly once after
    /// the fan-out loop, whatever the per-agent outcome. There is no retry,
    /// so an agent failure is logged and skipped.
    pub async fn send(&mut self, message: &str, identifier: &str) -> Result<()> {
        if self.history.has_been_notified(identifier) {
            debug!("Already sent notification for identifier {}", identifier);
            return Ok(());
        }

        for agent in &self.agents {
            info!("Sending notification to {}", agent.name());
            debug!("{}", message);
            if let Err(e) = agent.send(message).await {
                error!("Failed to send notification via {}: {}", agent.name(), e);
            }
        }

        self.history.add_history(identifier)?;
        Ok(())
    }
}
