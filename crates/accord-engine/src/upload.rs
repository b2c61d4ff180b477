//! Scheduler mode: evaluate the pending files of an upload against the
//! database rule tables and store the verdicts.

use std::sync::Arc;

use accord_core::Subject;
use accord_core::rules::TieredRuleSource;
use accord_db::repos::results::DbResultStore;
use accord_db::{AccordDb, DbHandle};
use tracing::{info, trace, warn};

use crate::context::RunContext;
use crate::dispatcher::{Dispatcher, RunSummary, SubjectFailure, SubjectStatus, SubjectWorker, WorkerFactory};
use crate::error::EngineError;
use crate::host::Heartbeat;
use crate::pipeline::{PipelineError, evaluate_subject};
use crate::repository::{Repository, SharedRepository};

/// Opens one database handle per worker.
pub struct UploadWorkerFactory<R> {
    db: AccordDb,
    repository: Arc<SharedRepository<R>>,
    ctx: Arc<RunContext>,
}

impl<R> UploadWorkerFactory<R> {
    pub const fn new(db: AccordDb, repository: Arc<SharedRepository<R>>, ctx: Arc<RunContext>) -> Self {
        Self { db, repository, ctx }
    }
}

impl<R: Repository + 'static> WorkerFactory for UploadWorkerFactory<R> {
    type Worker = UploadWorker<R>;

    async fn spawn_worker(&self) -> Result<UploadWorker<R>, EngineError> {
        Ok(UploadWorker {
            handle: self.db.spawn().await?,
            repository: Arc::clone(&self.repository),
            ctx: Arc::clone(&self.ctx),
        })
    }
}

pub struct UploadWorker<R> {
    handle: DbHandle,
    repository: Arc<SharedRepository<R>>,
    ctx: Arc<RunContext>,
}

impl<R: Repository + 'static> SubjectWorker for UploadWorker<R> {
    type Subject = i64;

    async fn process(&mut self, pfile: &i64) -> Result<SubjectStatus, SubjectFailure> {
        let pfile = *pfile;
        if pfile == 0 {
            return Ok(SubjectStatus::Skipped);
        }
        let subject = Subject::File(pfile).to_string();
        let read_failed = |e: accord_db::error::DatabaseError| SubjectFailure::Read {
            subject: subject.clone(),
            reason: e.to_string(),
        };

        let ids = self.handle.license_ids_for_file(pfile).await.map_err(read_failed)?;
        let name = self.handle.pfile_name(pfile).await.map_err(read_failed)?;
        let path = name
            .as_deref()
            .and_then(|name| self.repository.resolve(&self.ctx.repo_area, name));

        if ids.len() < 2 {
            return Ok(SubjectStatus::Skipped);
        }
        match &path {
            Some(path) => trace!(pfile, path = %path.display(), "file located"),
            None => warn!(pfile, name = name.as_deref().unwrap_or(""), "file not in repository"),
        }

        let licenses = self.handle.license_details(&ids).await.map_err(read_failed)?;
        let rules = TieredRuleSource::new(&self.handle);
        let mut store = DbResultStore::new(&self.handle, pfile, self.ctx.agent_id, self.ctx.default_marker);

        match (evaluate_subject(&licenses, &rules, &mut store).await, path) {
            (Ok(report), Some(_)) => Ok(SubjectStatus::Evaluated(report)),
            (Ok(report), None) => Ok(SubjectStatus::Unlocated(report)),
            (Err(PipelineError::Persist(reason)), _) => Err(SubjectFailure::Persistence { subject, reason }),
            (Err(PipelineError::Read(reason)), Some(_)) => Err(SubjectFailure::Read { subject, reason }),
            (Err(PipelineError::Read(reason)), None) => {
                warn!(pfile, %reason, "pairs of unlocated file not read");
                Err(SubjectFailure::PathResolution { subject })
            }
        }
    }
}

/// Evaluate every pending file of `upload`.
///
/// # Errors
///
/// Returns `EngineError` if the pending files cannot be listed or the
/// dispatcher fails (see [`Dispatcher::run`]).
pub async fn process_upload<R, H>(
    db: &AccordDb,
    upload: i64,
    ctx: Arc<RunContext>,
    repository: Arc<SharedRepository<R>>,
    heartbeat: Arc<H>,
) -> Result<RunSummary, EngineError>
where
    R: Repository + 'static,
    H: Heartbeat + 'static,
{
    let pending = db.primary().files_pending_for_upload(upload, ctx.agent_id).await?;
    info!(upload, files = pending.len(), workers = ctx.workers, "processing upload");

    let workers = ctx.workers;
    let factory = Arc::new(UploadWorkerFactory::new(db.clone(), repository, ctx));
    Dispatcher::new(factory, heartbeat, workers).run(pending).await
}

/// Outcome of a completed upload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRun {
    /// Run record id.
    pub run: i64,
    pub summary: RunSummary,
}

/// Process one upload inside a run record.
///
/// The record is written before any file is touched and marked successful
/// only when every file was processed. On error it is left unsuccessful.
///
/// # Errors
///
/// - `EngineError::RunRecord` if the record cannot be written
/// - `EngineError::Unresolved` if any file could not be located
/// - any error from [`process_upload`]
pub async fn run_upload<R, H>(
    db: &AccordDb,
    upload: i64,
    ctx: Arc<RunContext>,
    repository: Arc<SharedRepository<R>>,
    heartbeat: Arc<H>,
) -> Result<UploadRun, EngineError>
where
    R: Repository + 'static,
    H: Heartbeat + 'static,
{
    let primary = db.primary();
    let run = primary
        .start_run(ctx.agent_id, upload)
        .await
        .map_err(EngineError::RunRecord)?;

    let summary = process_upload(db, upload, ctx, repository, heartbeat).await?;
    if summary.path_errors > 0 {
        return Err(EngineError::Unresolved {
            upload,
            count: summary.path_errors,
        });
    }

    primary
        .finish_run(run, true)
        .await
        .map_err(EngineError::RunRecord)?;
    info!(
        upload,
        run,
        evaluated = summary.evaluated,
        recorded = summary.recorded,
        deduplicated = summary.deduplicated,
        "upload complete"
    );
    Ok(UploadRun { run, summary })
}
