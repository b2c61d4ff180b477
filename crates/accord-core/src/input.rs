//! Standalone input document: the files of a package and the licenses found
//! in each.
//!
//! ```json
//! {"results": [{"file": "src/main.c", "licenses": ["GPL-2.0-only", "MIT"]}]}
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::distinct_in_order;
use crate::errors::CoreError;

/// Pseudo-license dropped from standalone license lists.
pub const DUAL_LICENSE: &str = "Dual-license";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDocument {
    #[serde(default)]
    pub results: Vec<InputFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub file: String,
    #[serde(default)]
    pub licenses: Vec<String>,
}

impl InputFile {
    /// Distinct license names in first-seen order, without pseudo-licenses.
    #[must_use]
    pub fn license_names(&self) -> Vec<String> {
        distinct_in_order(
            self.licenses
                .iter()
                .filter(|name| name.as_str() != DUAL_LICENSE)
                .cloned(),
        )
    }
}

impl fmt::Display for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file)
    }
}

impl InputDocument {
    /// Parse the document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Document` if the JSON does not match the expected shape.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::document("input document", e))
    }

    /// Read and parse the document from disk.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Read` if the file cannot be read, or
    /// `CoreError::Document` if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
        Self::from_json_str(&json)
    }

    /// Every distinct license across all files, in first-seen order.
    ///
    /// Files with fewer than two licenses still contribute.
    #[must_use]
    pub fn all_licenses(&self) -> Vec<String> {
        distinct_in_order(self.results.iter().flat_map(InputFile::license_names))
    }
}
