use std::io::Write;
use std::sync::Arc;

use accord_config::AccordConfig;
use accord_db::AccordDb;
use accord_engine::{
    EngineError, FsRepository, Heartbeat, NoHeartbeat, RunContext, SharedRepository, run_upload,
};
use anyhow::Context;
use tokio::io::AsyncBufRead;
use tracing::{Instrument, error, info, info_span, warn};

use crate::bootstrap;
use crate::cli::root_commands::AgentArgs;
use crate::exit;
use crate::scheduler::{SchedulerLink, parse_upload};

/// Everything one upload run needs besides the upload id.
struct AgentRun {
    db: AccordDb,
    ctx: Arc<RunContext>,
    repository: Arc<SharedRepository<FsRepository>>,
}

impl AgentRun {
    async fn upload<H: Heartbeat + 'static>(&self, upload: i64, heartbeat: Arc<H>) -> Result<(), EngineError> {
        let run = run_upload(
            &self.db,
            upload,
            Arc::clone(&self.ctx),
            Arc::clone(&self.repository),
            heartbeat,
        )
        .await?;
        info!(upload, run = run.run, files = run.summary.evaluated, "upload finished");
        Ok(())
    }
}

/// Handle `accord agent`.
///
/// With `--upload` the given uploads are processed directly; otherwise upload
/// ids are read from the scheduler on stdin.
pub async fn handle(args: &AgentArgs, config: &AccordConfig) -> anyhow::Result<i32> {
    let span = info_span!(
        "agent",
        job = args.job_id,
        user = args.user_id,
        group = args.group_id
    );

    if args.uploads.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let link = SchedulerLink::new(stdin, std::io::stdout());
        serve(link, config).instrument(span).await
    } else {
        offline(&args.uploads, config).instrument(span).await
    }
}

async fn prepare(config: &AccordConfig) -> anyhow::Result<AgentRun> {
    let engine = &config.engine;
    let db = bootstrap::open_db(config).await?;
    let agent_id = db
        .primary()
        .register_agent(&engine.agent_name, &engine.agent_revision, &engine.agent_description)
        .await
        .with_context(|| format!("failed to register agent {}", engine.agent_name))?;
    let ctx = RunContext::new(
        agent_id,
        engine.marker()?,
        config.repository.area.clone(),
        engine.worker_count(),
    );
    info!(agent_id, workers = ctx.workers, "agent ready");

    Ok(AgentRun {
        db,
        ctx: Arc::new(ctx),
        repository: Arc::new(SharedRepository::new(FsRepository::new(
            config.repository.root.clone(),
        ))),
    })
}

async fn serve<R, W>(mut link: SchedulerLink<R, W>, config: &AccordConfig) -> anyhow::Result<i32>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let agent = match prepare(config).await {
        Ok(agent) => agent,
        Err(err) => {
            error!("{err:#}");
            link.bye(exit::USAGE)?;
            return Ok(exit::USAGE);
        }
    };
    let heartbeat = Arc::new(link.heartbeat());

    while let Some(job) = link.next_job().await? {
        let upload = parse_upload(&job);
        if upload == 0 {
            warn!(job = %job, "ignoring job without an upload id");
            continue;
        }
        if let Err(err) = agent.upload(upload, Arc::clone(&heartbeat)).await {
            error!(upload, "{err}");
            let code = exit::for_engine_error(&err);
            link.bye(code)?;
            return Ok(code);
        }
    }

    link.bye(exit::SUCCESS)?;
    Ok(exit::SUCCESS)
}

async fn offline(uploads: &[i64], config: &AccordConfig) -> anyhow::Result<i32> {
    let agent = prepare(config).await?;
    let heartbeat = Arc::new(NoHeartbeat);

    for &upload in uploads {
        if upload == 0 {
            continue;
        }
        if let Err(err) = agent.upload(upload, Arc::clone(&heartbeat)).await {
            error!(upload, "{err}");
            return Ok(exit::for_engine_error(&err));
        }
    }
    Ok(exit::SUCCESS)
}
