use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config directory: {0}")]
    InvalidConfigDirectory(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No notification agents: {0}")]
    NoNotificationAgents(String),

    #[error("Invalid notification agent config for '{agent}': {message}")]
    InvalidAgentConfig { agent: String, message: String },

    #[error("Unknown retailer: {0}")]
    UnknownRetailer(String),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
