pub mod config;
pub mod paths;

pub use config::{Config, GoalsConfig, LoggingConfig, StorageConfig, DEFAULT_MONTHLY_TARGET};
pub use paths::{base_path_override, PathManager};
