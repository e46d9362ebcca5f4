pub mod checker;
pub mod config;
pub mod error;
pub mod fetch;
pub mod history;
pub mod notify;
pub mod parsers;
pub mod product;
pub mod service;

// Re-export commonly used types
pub use checker::StockChecker;
pub use config::{load_configs_from_dir, RetailerConfig};
pub use error::AppError;
pub use history::{FileHistory, NotificationHistory};
pub use product::ProductInfo;
pub use service::NotificationService;

pub type Result<T> = std::result::Result<T, AppError>;
