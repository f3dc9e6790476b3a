// SPDX-License-Identifier: MIT

//! Command-line surface: one `railrna` binary with a subcommand per
//! execution backend, sharing the core-relevant flags from the manifest
//! through retry/compression tuning.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "railrna", version, about = "Rail-RNA pipeline driver")]
pub struct Cli {
    #[command(subcommand)]
    pub backend: BackendCommand,

    /// Minimum log level emitted on stderr.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit structured JSON log lines instead of human-readable text.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum BackendCommand {
    /// Run every Step sequentially on this host.
    Local(CommonArgs),
    /// Run across a pool of worker engines reached over SSH.
    Parallel(ParallelArgs),
    /// Emit a job-flow descriptor for a hosted MapReduce cluster.
    Cluster(ClusterArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Path to the sample manifest.
    #[arg(short = 'm', long)]
    pub manifest: PathBuf,

    /// Final output location (local path or object-store URL).
    #[arg(short = 'o', long)]
    pub output: String,

    /// Intermediate/scratch tree mirroring the pipeline's logical outputs.
    #[arg(long)]
    pub intermediate: String,

    /// Path to a TOML file describing the protostep chain to compile.
    #[arg(long)]
    pub pipeline: PathBuf,

    #[arg(short = 'p', long, default_value_t = 1)]
    pub num_processes: i64,

    #[arg(long)]
    pub keep_intermediates: bool,

    #[arg(short = 'g', long)]
    pub gzip_intermediates: bool,

    #[arg(long, default_value_t = 6)]
    pub gzip_level: i64,

    #[arg(long)]
    pub sort_memory_cap: Option<f64>,

    #[arg(long, default_value_t = 4)]
    pub max_task_attempts: i64,

    #[arg(long)]
    pub force: bool,

    #[arg(long)]
    pub profile: Option<String>,

    #[arg(long)]
    pub verbose: bool,

    #[arg(long)]
    pub scratch: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ParallelArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// `host` or `user@host` entries, one per worker engine.
    #[arg(long, required = true, num_args = 1..)]
    pub engine: Vec<String>,

    /// Skip copying reference indexes to workers that already have them.
    #[arg(long)]
    pub suppress_index_copy: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ClusterArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long, default_value_t = 1)]
    pub core_instance_count: u32,

    #[arg(long, default_value = "c1.xlarge")]
    pub master_instance_type: String,

    #[arg(long)]
    pub task_instance_bid_price: Option<f64>,

    #[arg(long, value_enum, default_value_t = ActionOnFailureArg::TerminateAll)]
    pub action_on_failure: ActionOnFailureArg,

    /// Days the intermediate directory survives after the run (`-1` = forever).
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    pub intermediate_lifetime: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionOnFailureArg {
    TerminateAll,
    CancelAndWait,
    Continue,
    TerminateCluster,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
