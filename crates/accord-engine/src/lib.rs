//! # accord-engine
//!
//! Runs the compatibility resolution procedure over many subjects.
//!
//! - [`pipeline`]: one subject, pair by pair (guard, classify, sink)
//! - [`dispatcher`]: a worker pool over subjects, each worker with its own
//!   storage handle, sharing a cooperative failure flag
//! - [`upload`]: scheduler mode against the database
//! - [`standalone`]: offline mode from an input document, writing a report

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod report;
pub mod repository;
pub mod standalone;
pub mod upload;

pub use context::RunContext;
pub use dispatcher::{Dispatcher, FailureFlag, RunSummary, SubjectFailure, SubjectStatus};
pub use error::EngineError;
pub use host::{BeatCounter, Heartbeat, NoHeartbeat};
pub use pipeline::{PipelineError, SubjectReport, evaluate_subject};
pub use report::{ReportEmitter, ReportFormat};
pub use repository::{FsRepository, Repository, SharedRepository};
pub use standalone::run_standalone;
pub use upload::{UploadRun, process_upload, run_upload};
