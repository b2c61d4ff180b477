//! Offline mode: evaluate an input document against a static rule document
//! and write a report.

use std::io::Write;
use std::sync::Arc;

use accord_core::input::{InputDocument, InputFile};
use accord_core::rules::StaticRuleSource;
use accord_core::{License, Subject};
use tracing::info;

use crate::dispatcher::{Dispatcher, RunSummary, SubjectFailure, SubjectStatus, SubjectWorker, WorkerFactory};
use crate::error::EngineError;
use crate::host::Heartbeat;
use crate::pipeline::{PipelineError, SubjectReport, evaluate_subject};
use crate::report::{ReportEmitter, ReportFormat, ReportRow, ReportStore};

/// Evaluate `names` and collect the report rows.
async fn evaluate_names(
    source: &StaticRuleSource,
    names: &[String],
) -> Result<(SubjectReport, Vec<ReportRow>), PipelineError> {
    let licenses: Vec<License<String>> = names.iter().map(|name| source.license(name)).collect();
    let mut store = ReportStore::default();
    let report = evaluate_subject(&licenses, source, &mut store).await?;
    Ok((report, store.into_rows()))
}

struct StandaloneWorkerFactory<W> {
    source: Arc<StaticRuleSource>,
    emitter: Arc<ReportEmitter<W>>,
}

impl<W: Write + Send + 'static> WorkerFactory for StandaloneWorkerFactory<W> {
    type Worker = StandaloneWorker<W>;

    async fn spawn_worker(&self) -> Result<StandaloneWorker<W>, EngineError> {
        Ok(StandaloneWorker {
            source: Arc::clone(&self.source),
            emitter: Arc::clone(&self.emitter),
        })
    }
}

struct StandaloneWorker<W> {
    source: Arc<StaticRuleSource>,
    emitter: Arc<ReportEmitter<W>>,
}

impl<W: Write + Send + 'static> SubjectWorker for StandaloneWorker<W> {
    type Subject = InputFile;

    async fn process(&mut self, file: &InputFile) -> Result<SubjectStatus, SubjectFailure> {
        let names = file.license_names();
        let (report, rows) = evaluate_names(&self.source, &names)
            .await
            .map_err(|e| SubjectFailure::Read {
                subject: file.file.clone(),
                reason: e.to_string(),
            })?;

        // Every file gets a block, even one with nothing to pair.
        self.emitter
            .emit(&Subject::Named(file.file.clone()), &rows)
            .map_err(|e| SubjectFailure::Persistence {
                subject: file.file.clone(),
                reason: e.to_string(),
            })?;

        if names.len() < 2 {
            Ok(SubjectStatus::Skipped)
        } else {
            Ok(SubjectStatus::Evaluated(report))
        }
    }
}

/// Evaluate every file of `input`, then every distinct license of the whole
/// document, writing one report block per file and a final aggregate block.
///
/// File blocks may appear in any order when `workers > 1`; the aggregate
/// block is always last.
///
/// # Errors
///
/// Returns `EngineError::Output` if the report cannot be written, or
/// `EngineError::Persistence` if a file block could not be written.
pub async fn run_standalone<W, H>(
    input: &InputDocument,
    source: Arc<StaticRuleSource>,
    format: ReportFormat,
    out: W,
    workers: usize,
    heartbeat: Arc<H>,
) -> Result<(RunSummary, W), EngineError>
where
    W: Write + Send + 'static,
    H: Heartbeat + 'static,
{
    let emitter = Arc::new(ReportEmitter::new(out, format, source.default_outcome()));
    emitter.begin()?;

    let summary = {
        let factory = Arc::new(StandaloneWorkerFactory {
            source: Arc::clone(&source),
            emitter: Arc::clone(&emitter),
        });
        Dispatcher::new(factory, heartbeat, workers)
            .run(input.results.clone())
            .await?
    };

    let (aggregate, rows) = evaluate_names(&source, &input.all_licenses()).await?;
    emitter.emit(&Subject::Aggregate, &rows)?;
    info!(
        files = summary.subjects,
        evaluated = summary.evaluated,
        package_pairs = aggregate.pairs,
        "standalone scan complete"
    );

    let emitter = Arc::try_unwrap(emitter)
        .map_err(|_| EngineError::Worker("report writer still shared after workers exited".into()))?;
    Ok((summary, emitter.finish()?))
}
