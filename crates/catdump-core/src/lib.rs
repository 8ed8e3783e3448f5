mod app_config;
mod config;

use thiserror::Error;

pub use app_config::{AppConfig, BackoffKind};
pub use config::{load_app_config, load_app_config_from_env};

/// Default `User-Agent` sent with every catalog request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:85.0) Gecko/20100101 Firefox/85.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
