use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate an input document against a rule document, without a database
    Scan(ScanArgs),
    /// Evaluate uploads from the database, driven by the scheduler on stdin
    Agent(AgentArgs),
    /// Write the database rules as a rule document
    ExportRules(ExportRulesArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ScanArgs {
    /// Input document listing files and the licenses found in each
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// License-metadata table (`name,type` lines)
    #[arg(short = 't', long)]
    pub types: Option<PathBuf>,

    /// Rule document (YAML)
    #[arg(short = 'r', long)]
    pub rules: Option<PathBuf>,

    /// Output JSON instead of text
    #[arg(short = 'J', long)]
    pub json: bool,

    /// Worker count (defaults to the configured value)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct AgentArgs {
    /// Process these uploads and exit instead of reading the scheduler
    #[arg(long = "upload", value_name = "ID")]
    pub uploads: Vec<i64>,

    /// Scheduler job id
    #[arg(long)]
    pub job_id: Option<i64>,

    /// Scheduler user id
    #[arg(long)]
    pub user_id: Option<i64>,

    /// Scheduler group id
    #[arg(long)]
    pub group_id: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct ExportRulesArgs {
    /// Output path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
