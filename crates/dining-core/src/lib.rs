pub mod app_config;
pub mod config;
pub mod sources;
pub mod status;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sources::{dining_halls, SourceConfig, DEFAULT_ACTIVITY_BASE_URL};
pub use status::{AggregateResponse, DiningStatus, StatusRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
