//! Default documents for standalone scans.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StandaloneConfig {
    /// YAML rule document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,

    /// `name,type` license-metadata table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<PathBuf>,
}

impl StandaloneConfig {
    pub const fn is_configured(&self) -> bool {
        self.rules.is_some() && self.types.is_some()
    }

    /// Pick the rule and metadata documents, preferring explicit paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when a document is neither given
    /// nor configured.
    pub fn documents(
        &self,
        rules: Option<PathBuf>,
        types: Option<PathBuf>,
    ) -> Result<(PathBuf, PathBuf), ConfigError> {
        let rules = rules.or_else(|| self.rules.clone());
        let types = types.or_else(|| self.types.clone());
        match (rules, types) {
            (Some(rules), Some(types)) => Ok((rules, types)),
            _ => Err(ConfigError::NotConfigured {
                section: "standalone".to_string(),
            }),
        }
    }
}
