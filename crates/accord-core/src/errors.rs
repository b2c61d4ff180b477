//! Cross-cutting error types for accord.
//!
//! Errors raised while loading documents or validating input. Storage and
//! engine errors live in their own crates (`DatabaseError`, `EngineError`);
//! the binary converges them through `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can be raised by any accord crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A document could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rule, metadata, or input document is malformed.
    #[error("Malformed {document}: {reason}")]
    Document { document: String, reason: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn document(document: &str, reason: impl ToString) -> Self {
        Self::Document {
            document: document.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
