//! # accord-config
//!
//! Layered configuration loading for accord using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ACCORD_*` prefix, `__` as separator)
//! 2. An explicit TOML file (`--config`)
//! 3. Project-level `.accord/config.toml`
//! 4. User-level `~/.config/accord/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ACCORD_ENGINE__WORKERS` -> `engine.workers`,
//! `ACCORD_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use accord_config::AccordConfig;
//!
//! let config = AccordConfig::load_with_dotenv(None).expect("config");
//! println!("workers: {}", config.engine.worker_count());
//! ```

mod database;
mod engine;
mod error;
mod repository;
mod standalone;

pub use database::DatabaseConfig;
pub use engine::EngineConfig;
pub use error::ConfigError;
pub use repository::RepositoryConfig;
pub use standalone::StandaloneConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ACCORD_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccordConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub standalone: StandaloneConfig,
}

impl AccordConfig {
    /// Load configuration from the default sources.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering `explicit` above the TOML files.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load_from(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".accord/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // An explicit file must exist; Toml::file would silently skip it.
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check values serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("accord").join("config.toml"))
    }
}
