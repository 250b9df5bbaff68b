//! Shared configuration and domain types for the Soulcare complaint workspace.

pub mod app_config;
pub mod complaints;
pub mod config;

pub use app_config::{AppConfig, Environment};
pub use complaints::{Complaint, NewComplaint, ValidationError};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
