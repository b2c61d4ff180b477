//! Worker pool over subjects.
//!
//! Subjects are split into contiguous chunks, one per worker. Every worker
//! owns its own storage handle (obtained from the [`WorkerFactory`]) and
//! processes its chunk in order. Workers share a [`FailureFlag`]: once a
//! fatal subject failure raises it, no worker starts another subject.

use std::fmt::Display;
use std::future::Future;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, warn};

use crate::error::EngineError;
use crate::host::Heartbeat;
use crate::pipeline::SubjectReport;

/// How a subject ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectStatus {
    Evaluated(SubjectReport),
    /// Nothing to evaluate (no id, or fewer than two licenses).
    Skipped,
    /// Evaluated, but the file behind the subject could not be located.
    /// Raises the failure flag like a path failure.
    Unlocated(SubjectReport),
}

/// A subject that could not be completed.
#[derive(Debug, thiserror::Error)]
pub enum SubjectFailure {
    /// The file behind the subject could not be located, and its pairs
    /// could not be read either.
    #[error("{subject}: path could not be resolved")]
    PathResolution { subject: String },

    /// Rules, licenses, or existing results could not be read.
    #[error("{subject}: read failed: {reason}")]
    Read { subject: String, reason: String },

    /// A verdict could not be stored.
    #[error("{subject}: persistence failed: {reason}")]
    Persistence { subject: String, reason: String },
}

impl SubjectFailure {
    /// Whether the failure stops other workers from starting new subjects.
    #[must_use]
    pub const fn raises_flag(&self) -> bool {
        matches!(self, Self::PathResolution { .. } | Self::Persistence { .. })
    }
}

/// Processes subjects one at a time with a handle it owns.
pub trait SubjectWorker: Send {
    type Subject: Display + Send + Sync + 'static;

    fn process(
        &mut self,
        subject: &Self::Subject,
    ) -> impl Future<Output = Result<SubjectStatus, SubjectFailure>> + Send;
}

/// Builds one worker per chunk.
pub trait WorkerFactory: Send + Sync + 'static {
    type Worker: SubjectWorker + 'static;

    /// # Errors
    ///
    /// Returns `EngineError` if the worker's handle cannot be opened.
    fn spawn_worker(&self) -> impl Future<Output = Result<Self::Worker, EngineError>> + Send;
}

type SubjectOf<F> = <<F as WorkerFactory>::Worker as SubjectWorker>::Subject;

/// Shared "stop starting new subjects" signal.
#[derive(Debug, Default)]
pub struct FailureFlag(AtomicBool);

impl FailureFlag {
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Totals for one dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub subjects: usize,
    pub evaluated: usize,
    pub skipped: usize,
    /// Subjects never started because the failure flag was raised.
    pub abandoned: usize,
    pub path_errors: usize,
    pub read_errors: usize,
    pub pairs: usize,
    pub deduplicated: usize,
    pub recorded: usize,
}

impl RunSummary {
    pub const fn absorb(&mut self, other: &Self) {
        self.subjects += other.subjects;
        self.evaluated += other.evaluated;
        self.skipped += other.skipped;
        self.abandoned += other.abandoned;
        self.path_errors += other.path_errors;
        self.read_errors += other.read_errors;
        self.pairs += other.pairs;
        self.deduplicated += other.deduplicated;
        self.recorded += other.recorded;
    }

    const fn count(&mut self, report: &SubjectReport) {
        self.evaluated += 1;
        self.pairs += report.pairs;
        self.deduplicated += report.deduplicated;
        self.recorded += report.recorded;
    }

    /// Whether every subject completed without a path failure.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.path_errors == 0 && self.abandoned == 0
    }
}

pub struct Dispatcher<F, H> {
    factory: Arc<F>,
    heartbeat: Arc<H>,
    workers: usize,
}

impl<F, H> Dispatcher<F, H>
where
    F: WorkerFactory,
    H: Heartbeat + 'static,
{
    pub fn new(factory: Arc<F>, heartbeat: Arc<H>, workers: usize) -> Self {
        Self {
            factory,
            heartbeat,
            workers: workers.max(1),
        }
    }

    /// Process every subject and wait for all workers.
    ///
    /// Path and read failures are logged and counted. A persistence failure
    /// stops the run: remaining workers drain (finishing the subject they are
    /// on) and the failure is returned once all of them have exited.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` for the first persistence failure,
    /// or `EngineError::Worker` if a worker could not start or panicked.
    pub async fn run(&self, subjects: Vec<SubjectOf<F>>) -> Result<RunSummary, EngineError> {
        let total = subjects.len();
        let mut summary = RunSummary {
            subjects: total,
            ..RunSummary::default()
        };
        if total == 0 {
            return Ok(summary);
        }

        let subjects: Arc<[SubjectOf<F>]> = subjects.into();
        let flag = Arc::new(FailureFlag::default());
        let ranges = chunk_ranges(total, self.workers);
        debug!(subjects = total, workers = ranges.len(), "dispatching");

        let mut handles = Vec::with_capacity(ranges.len());
        for range in ranges {
            let factory = Arc::clone(&self.factory);
            let heartbeat = Arc::clone(&self.heartbeat);
            let subjects = Arc::clone(&subjects);
            let flag = Arc::clone(&flag);
            handles.push(tokio::spawn(async move {
                let mut worker = match factory.spawn_worker().await {
                    Ok(worker) => worker,
                    Err(err) => {
                        flag.raise();
                        return (RunSummary::default(), Some(EngineError::Worker(err.to_string())));
                    }
                };
                work_chunk(&mut worker, &subjects[range], &flag, heartbeat.as_ref()).await
            }));
        }

        let mut first_error = None;
        for handle in handles {
            match handle.await {
                Ok((chunk, err)) => {
                    summary.absorb(&chunk);
                    if first_error.is_none() {
                        first_error = err;
                    }
                }
                Err(join_err) => {
                    error!(error = %join_err, "worker task failed");
                    if first_error.is_none() {
                        first_error = Some(EngineError::Worker(join_err.to_string()));
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }
}

async fn work_chunk<W, H>(
    worker: &mut W,
    subjects: &[W::Subject],
    flag: &FailureFlag,
    heartbeat: &H,
) -> (RunSummary, Option<EngineError>)
where
    W: SubjectWorker,
    H: Heartbeat,
{
    let mut summary = RunSummary::default();

    for (done, subject) in subjects.iter().enumerate() {
        if flag.is_raised() {
            summary.abandoned += subjects.len() - done;
            break;
        }

        match worker.process(subject).await {
            Ok(SubjectStatus::Evaluated(report)) => {
                summary.count(&report);
                heartbeat.beat(1);
            }
            Ok(SubjectStatus::Skipped) => summary.skipped += 1,
            Ok(SubjectStatus::Unlocated(report)) => {
                flag.raise();
                error!(%subject, "path could not be resolved");
                summary.count(&report);
                summary.path_errors += 1;
                heartbeat.beat(1);
            }
            Err(failure) => {
                if failure.raises_flag() {
                    flag.raise();
                }
                match failure {
                    SubjectFailure::PathResolution { .. } => {
                        error!(%subject, "{failure}");
                        summary.path_errors += 1;
                    }
                    SubjectFailure::Read { .. } => {
                        warn!(%subject, "{failure}");
                        summary.read_errors += 1;
                    }
                    SubjectFailure::Persistence { .. } => {
                        error!(%subject, "{failure}");
                        let remaining = subjects.len() - done - 1;
                        summary.abandoned += remaining;
                        return (summary, Some(EngineError::Persistence(failure.to_string())));
                    }
                }
            }
        }
    }

    (summary, None)
}

/// Split `0..total` into at most `workers` contiguous, non-empty ranges.
fn chunk_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let chunk = total.div_ceil(workers.clamp(1, total));
    (0..total)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(total))
        .collect()
}
