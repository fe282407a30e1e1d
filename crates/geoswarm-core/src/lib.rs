//! Shared domain types and configuration for geoswarm.

use thiserror::Error;

mod app_config;
mod brand;
mod campaign;
mod config;
mod platform;

pub use app_config::{AppConfig, Environment};
pub use brand::{BrandContext, BrandVoice};
pub use campaign::{ActivityKind, CampaignStatus, ACTOR_KEYWORD_RESEARCHER, ACTOR_SUPER, ACTOR_USER};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::{Platform, UnknownPlatform};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
