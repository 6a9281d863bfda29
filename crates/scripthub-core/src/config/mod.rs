//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has defaults so an empty file is valid.

pub mod limits;
pub mod logging;
pub mod store;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::limits::LimitsConfig;
use self::logging::LoggingConfig;
use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Document store settings.
    #[serde(default)]
    #[validate(nested)]
    pub store: StoreConfig,
    /// Field and hierarchy limits enforced by validation.
    #[serde(default)]
    #[validate(nested)]
    pub limits: LimitsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml`, the file at `path`, and environment
    /// variables prefixed with `SCRIPTHUB__` (both files are optional).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SCRIPTHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config
            .validate()
            .map_err(|e| AppError::configuration(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }
}
