use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use shelfwatch::checker::StockChecker;
use shelfwatch::config::{load_configs_from_dir, RetailerConfig};
use shelfwatch::fetch::PageFetcher;
use shelfwatch::history::FileHistory;
use shelfwatch::notify::build_agents;
use shelfwatch::parsers::parser_for;
use shelfwatch::service::NotificationService;

/// Check configured retailer pages for stock and notify on availability.
#[derive(Parser, Debug)]
#[command(name = "shelfwatch", version, about)]
struct Cli {
    /// Directory containing one JSON config per retailer
    #[arg(long, value_name = "DIR")]
    config_dir: PathBuf,

    /// Line-delimited log of already-notified product URLs
    #[arg(long, value_name = "PATH", default_value = "history.log")]
    history_file: PathBuf,

    /// Truncate the notification history before checking
    #[arg(long)]
    clear_history: bool,

    /// User-agent header sent with every page request
    #[arg(long, value_name = "STRING", default_value = shelfwatch::fetch::DEFAULT_USER_AGENT)]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelfwatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if cli.clear_history {
        use shelfwatch::history::NotificationHistory;
        let mut history = FileHistory::load(&cli.history_file)?;
        history.clear_history()?;
    }

    let configs = load_configs_from_dir(&cli.config_dir)?;
    if configs.is_empty() {
        bail!(
            "no usable retailer configs in {}",
            cli.config_dir.display()
        );
    }

    let mut checks_run = 0usize;
    for config in configs {
        match build_checker(&config, &cli.history_file, &cli.user_agent) {
            Ok(mut checker) => {
                checker.run_check_cycle().await?;
                checks_run += 1;
            }
            Err(e) => {
                error!("Skipping config '{}': {}", config.name, e);
            }
        }
    }

    if checks_run == 0 {
        bail!("no retailer checks could be run");
    }
    info!("Completed {} retailer check(s)", checks_run);
    Ok(())
}

fn build_checker(
    config: &RetailerConfig,
    history_file: &std::path::Path,
    user_agent: &str,
) -> shelfwatch::Result<StockChecker> {
    let parser = parser_for(&config.name)?;
    let agents = build_agents(&config.notification_agents)?;
    if agents.is_empty() {
        return Err(shelfwatch::AppError::NoNotificationAgents(format!(
            "no valid notification agents built from config '{}'",
            config.name
        )));
    }

    let history = FileHistory::load(history_file)?;
    let mut service = NotificationService::new(Box::new(history));
    for agent in agents {
        service.register_agent(agent);
    }

    let fetcher = PageFetcher::with_user_agent(user_agent)?;
    Ok(StockChecker::new(
        config,
        parser,
        Box::new(fetcher),
        service,
    ))
}
