//! Content-addressed file repository layout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_root() -> PathBuf {
    PathBuf::from("repository")
}

fn default_area() -> String {
    "files".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryConfig {
    /// Repository root directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Storage area under the root that holds scanned files.
    #[serde(default = "default_area")]
    pub area: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            area: default_area(),
        }
    }
}
