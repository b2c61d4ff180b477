//! Engine error types for accord-engine.

use accord_core::CoreError;
use accord_db::error::DatabaseError;

use crate::pipeline::PipelineError;

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// The run bookkeeping row could not be written.
    #[error("run record could not be written: {0}")]
    RunRecord(#[source] DatabaseError),

    /// A verdict could not be stored; no further subjects were started.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Files of the upload could not be located; the run is left unfinished.
    #[error("{count} file(s) of upload {upload} could not be located")]
    Unresolved { upload: i64, count: usize },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A worker task could not start or panicked.
    #[error("worker failed: {0}")]
    Worker(String),

    #[error("report output failed: {0}")]
    Output(#[from] std::io::Error),
}
