use std::fmt;

use serde::{Deserialize, Serialize};

/// The unit a run evaluates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// A scanned file, keyed by its pfile id.
    File(i64),
    /// A file named by a standalone input document.
    Named(String),
    /// Every distinct license seen across the run.
    Aggregate,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(pfile) => write!(f, "pfile {pfile}"),
            Self::Named(name) => f.write_str(name),
            Self::Aggregate => f.write_str("all licenses"),
        }
    }
}
