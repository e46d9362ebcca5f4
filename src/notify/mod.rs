pub mod agent;
pub mod discord;

pub use agent::NotificationAgent;
pub use discord::DiscordAgent;

use tracing::{error, info};

use crate::config::AgentConfig;
use crate::error::{AppError, Result};

/// Build notification agents from config entries.
///
/// Unknown agent names are logged and skipped; an entry that names a known
/// agent but is missing required fields is a hard error for that entry.
pub fn build_agents(configs: &[AgentConfig]) -> Result<Vec<Box<dyn NotificationAgent>>> {
    let mut agents: Vec<Box<dyn NotificationAgent>> = Vec::new();
    for config in configs {
        match config.name.to_lowercase().as_str() {
            "discord" => agents.push(Box::new(build_discord_agent(config)?)),
            other => {
                error!("Unable to locate notification agent with name {}", other);
            }
        }
    }
    Ok(agents)
}

fn build_discord_agent(config: &AgentConfig) -> Result<DiscordAgent> {
    let webhook = config
        .webhook
        .as_deref()
        .filter(|w| !w.is_empty())
        .ok_or_else(|| AppError::InvalidAgentConfig {
            agent: config.name.clone(),
            message: "missing webhook URL".to_string(),
        })?;
    info!("Creating discord agent");
    Ok(DiscordAgent::new(webhook, &config.name))
}
