use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{error, info};
use url::Url;

use crate::error::{AppError, Result};

/// Static per-retailer configuration, loaded once from a JSON document and
/// immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    pub name: String,
    #[serde(default)]
    pub links: PageLinks,
    #[serde(default)]
    pub ignore_title_keywords: Vec<String>,
    #[serde(default)]
    pub ignore_urls: Vec<String>,
    #[serde(default)]
    pub notification_agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub search_pages: Vec<String>,
    #[serde(default)]
    pub product_pages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub webhook: Option<String>,
}

impl RetailerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Config("retailer name must not be empty".into()));
        }

        if self.notification_agents.is_empty() {
            return Err(AppError::NoNotificationAgents(format!(
                "config '{}' must provide at least one notification agent",
                self.name
            )));
        }

        for page in self
            .links
            .search_pages
            .iter()
            .chain(self.links.product_pages.iter())
        {
            Url::parse(page).map_err(|e| {
                AppError::Config(format!("invalid page URL '{}' in '{}': {}", page, self.name, e))
            })?;
        }

        for agent in &self.notification_agents {
            if let Some(webhook) = &agent.webhook {
                Url::parse(webhook).map_err(|e| {
                    AppError::Config(format!(
                        "invalid webhook URL for agent '{}' in '{}': {}",
                        agent.name, self.name, e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

/// Load every `*.json` file under the given directory, recursively, as a
/// retailer config.
///
/// A malformed or invalid file is logged and skipped; only a missing or
/// non-directory path is an error. Whether an empty result is fatal is the
/// caller's call.
pub fn load_configs_from_dir(config_dir: &Path) -> Result<Vec<RetailerConfig>> {
    if !config_dir.is_dir() {
        return Err(AppError::InvalidConfigDirectory(
            config_dir.display().to_string(),
        ));
    }

    let mut configs = Vec::new();
    let mut entries = Vec::new();
    collect_json_files(config_dir, &mut entries)?;
    entries.sort();

    for path in entries {
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        let config: RetailerConfig = match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                error!("Invalid JSON in {}: {}", path.display(), e);
                continue;
            }
        };
        if let Err(e) = config.validate() {
            error!("Invalid config in {}: {}", path.display(), e);
            continue;
        }
        configs.push(config);
    }

    info!(
        "Loaded {} retailer config(s) from {}",
        configs.len(),
        config_dir.display()
    );
    Ok(configs)
}

fn collect_json_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}
