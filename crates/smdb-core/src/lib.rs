pub mod app_config;
pub mod config;
pub mod post;

pub use app_config::{
    AppConfig, Environment, FacebookCredentials, InstagramCredentials, PlatformCredentials,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use post::{matches_subject, Comment, Platform, SocialPost, UnknownPlatform};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("{platform} collection requires {}", .vars.join(" and "))]
    MissingCredentials {
        platform: Platform,
        vars: Vec<&'static str>,
    },

    #[error("no platforms selected and SMDB_DEFAULT_PLATFORMS is empty")]
    NoPlatformsSelected,
}
