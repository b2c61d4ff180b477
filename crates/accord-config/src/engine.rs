//! Engine and agent identity settings.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_workers() -> usize {
    0
}

fn default_marker() -> String {
    "f".to_string()
}

fn default_agent_name() -> String {
    "compatibility".to_string()
}

fn default_agent_revision() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_agent_description() -> String {
    "Pairwise license compatibility".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Worker pool size. `0` uses the available hardware parallelism.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Single-character code stored for pairs no rule decided.
    #[serde(default = "default_marker")]
    pub default_marker: String,

    /// Name the agent registers under; results are stamped with its id.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    #[serde(default = "default_agent_revision")]
    pub agent_revision: String,

    #[serde(default = "default_agent_description")]
    pub agent_description: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            default_marker: default_marker(),
            agent_name: default_agent_name(),
            agent_revision: default_agent_revision(),
            agent_description: default_agent_description(),
        }
    }
}

impl EngineConfig {
    /// Effective worker count, never zero.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
    }

    /// The default marker as a single character.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless the marker is exactly one character.
    pub fn marker(&self) -> Result<char, ConfigError> {
        let mut chars = self.default_marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConfigError::invalid(
                "engine.default_marker",
                format!(
                    "expected exactly one character, got '{}'",
                    self.default_marker
                ),
            )),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.marker()?;
        if self.agent_name.trim().is_empty() {
            return Err(ConfigError::invalid("engine.agent_name", "must not be empty"));
        }
        Ok(())
    }
}
