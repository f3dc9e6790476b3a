// SPDX-License-Identifier: MIT

//! Orchestration: validator -> compiler -> backend dispatch, one path per
//! [`BackendCommand`] variant.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use railrna_cluster::{build_job_flow, ClusterSettings};
use railrna_compiler::{FailurePolicy, InstanceGroup, InstanceRole, Market, Pipeline, PipelineCompiler};
use railrna_core::{EngineId, ExternalToolConfig, ExternalUrlBackend, IdGen, Url, UrlBackend, UuidIdGen};
use railrna_executor::{CancelToken, ExecuteError, ExecutorConfig, LocalExecutor};
use railrna_parallel::{group_by_message, Engine, LocalEngine, ParallelDispatcher, RemoteEngine, SharedAssets};
use railrna_spec::{Backend as SpecBackend, RunConfig, Validator};

use crate::cli::{ActionOnFailureArg, BackendCommand, ClusterArgs, Cli, CommonArgs, ParallelArgs};
use crate::config::build_run_config;
use crate::exit_error;
use crate::pipeline_file::load_protosteps;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.backend {
        BackendCommand::Local(args) => run_local(args).await,
        BackendCommand::Parallel(args) => run_parallel(args).await,
        BackendCommand::Cluster(args) => run_cluster(args).await,
    }
}

/// Runs the shared validate-then-compile path every backend starts with:
/// environment check, accumulating validation, protostep compilation.
/// Each failure mode prints its own detail lines to stderr before
/// returning a [`exit_error::CONFIG_ERROR`]-tagged error, so the exit
/// message isn't the only thing naming what went wrong.
async fn prepare_pipeline(
    args: &CommonArgs,
    spec_backend: SpecBackend,
    reducer_count: u32,
    backend: &dyn UrlBackend,
) -> Result<(RunConfig, Pipeline)> {
    let protosteps = load_protosteps(&args.pipeline)?;
    let cfg = build_run_config(args, spec_backend, &protosteps)?;

    let validator = Validator::new(backend);
    if let Err(env_err) = validator.check_environment(&cfg) {
        eprintln!("{env_err}");
        bail!(exit_error::CONFIG_ERROR);
    }

    let (report, _manifest) = validator.validate(&cfg, &protosteps).await;
    if !report.is_ok() {
        for err in &report.errors {
            eprintln!("{err}");
        }
        bail!(exit_error::CONFIG_ERROR);
    }

    let intermediate_dir = Url::parse(args.intermediate.clone());
    let pipeline = PipelineCompiler::compile(
        &protosteps,
        reducer_count,
        &intermediate_dir,
        &cfg.output,
        spec_backend,
    )
    .map_err(|errors| {
        for err in &errors {
            eprintln!("{err}");
        }
        anyhow::Error::new(exit_error::CONFIG_ERROR)
    })?;

    Ok((cfg, pipeline))
}

fn map_execute_err(err: ExecuteError) -> anyhow::Error {
    let code = match err {
        ExecuteError::Cancelled => exit_error::CANCELLED,
        _ => exit_error::EXECUTION_ERROR,
    };
    anyhow::Error::new(err).context(code)
}

fn executor_config(args: &CommonArgs) -> ExecutorConfig {
    ExecutorConfig {
        num_processes: args.num_processes.max(1) as usize,
        max_task_attempts: args.max_task_attempts.max(1) as u32,
        gzip_intermediates: args.gzip_intermediates,
        gzip_level: args.gzip_level as u32,
        sort_memory_cap: args.sort_memory_cap.map(|v| v.to_string()),
        scratch_dir: args
            .scratch
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("railrna-scratch")),
        sort_command: "sort".to_string(),
        keep_intermediates: args.keep_intermediates,
    }
}

async fn run_local(args: CommonArgs) -> Result<()> {
    let backend = ExternalUrlBackend::new(ExternalToolConfig::default());
    let reducer_count = args.num_processes.max(1) as u32;
    let (_cfg, pipeline) = prepare_pipeline(&args, SpecBackend::Local, reducer_count, &backend).await?;

    let executor = LocalExecutor::new(executor_config(&args));
    let cancel = CancelToken::new();
    cancel.spawn_signal_watcher();

    executor
        .run_pipeline(&pipeline, &backend, &cancel)
        .await
        .map_err(map_execute_err)?;

    Ok(())
}

fn build_engine(index: usize, spec: &str) -> Arc<dyn Engine> {
    let id = EngineId::new(format!("engine-{index}"));
    match spec.split_once('@') {
        Some((user, host)) => Arc::new(RemoteEngine::new(id, host, Some(user.to_string()))),
        None if spec == "localhost" || spec == "127.0.0.1" => {
            Arc::new(LocalEngine::new(id, spec.to_string()))
        }
        None => Arc::new(RemoteEngine::new(id, spec.to_string(), None)),
    }
}

async fn run_parallel(args: ParallelArgs) -> Result<()> {
    let backend = ExternalUrlBackend::new(ExternalToolConfig::default());
    let reducer_count = args.common.num_processes.max(1) as u32 * args.engine.len().max(1) as u32;
    let (cfg, pipeline) =
        prepare_pipeline(&args.common, SpecBackend::Parallel, reducer_count, &backend).await?;

    let engines: Vec<Arc<dyn Engine>> = args
        .engine
        .iter()
        .enumerate()
        .map(|(i, spec)| build_engine(i, spec))
        .collect();
    let dispatcher = ParallelDispatcher::new(engines);

    let id_gen = UuidIdGen;
    dispatcher
        .probe(Path::new(&args.common.intermediate), &id_gen)
        .await
        .map_err(|err| anyhow::Error::new(err).context(exit_error::CONFIG_ERROR))?;

    let scratch_dir = args
        .common
        .scratch
        .clone()
        .unwrap_or_else(|| PathBuf::from("/tmp/railrna-parallel"));
    let assets = SharedAssets {
        code_archive: PathBuf::from("railrna-worker.tar.gz"),
        manifest: PathBuf::from(&cfg.manifest_source),
        indexes: vec![],
        suppress_indexes: args.suppress_index_copy,
    };
    dispatcher
        .stage_assets(&scratch_dir, &assets)
        .await
        .map_err(|err| anyhow::Error::new(err).context(exit_error::EXECUTION_ERROR))?;

    let protosteps = load_protosteps(&args.common.pipeline)?;
    let configs_by_engine: HashMap<EngineId, RunConfig> = dispatcher
        .engines
        .iter()
        .map(|e| (e.id().clone(), cfg.clone()))
        .collect();
    let revalidate_backend: Arc<dyn UrlBackend> =
        Arc::new(ExternalUrlBackend::new(ExternalToolConfig::default()));
    let validations = dispatcher
        .revalidate_per_engine(&configs_by_engine, &protosteps, |_id| revalidate_backend.clone())
        .await;

    let grouped = group_by_message(&validations);
    if !grouped.is_empty() {
        for group in &grouped {
            let hosts: Vec<&str> = group.engines.iter().map(|e| e.as_str()).collect();
            eprintln!("{} (hosts: {})", group.message, hosts.join(", "));
        }
        bail!(exit_error::CONFIG_ERROR);
    }

    let executor = LocalExecutor::new(executor_config(&args.common));
    let cancel = CancelToken::new();
    cancel.spawn_signal_watcher();
    executor
        .run_pipeline(&pipeline, &backend, &cancel)
        .await
        .map_err(map_execute_err)?;

    Ok(())
}

fn failure_policy_override(policy: FailurePolicy, action: ActionOnFailureArg) -> FailurePolicy {
    if policy != FailurePolicy::TerminateAll {
        return policy;
    }
    match action {
        ActionOnFailureArg::TerminateAll => FailurePolicy::TerminateAll,
        ActionOnFailureArg::CancelAndWait => FailurePolicy::CancelAndWait,
        ActionOnFailureArg::Continue => FailurePolicy::Continue,
        ActionOnFailureArg::TerminateCluster => FailurePolicy::TerminateCluster,
    }
}

fn build_instance_groups(args: &ClusterArgs) -> Vec<InstanceGroup> {
    let mut groups = vec![
        InstanceGroup {
            role: InstanceRole::Master,
            instance_type: args.master_instance_type.clone(),
            count: 1,
            market: Market::OnDemand,
            bid_price: None,
        },
        InstanceGroup {
            role: InstanceRole::Core,
            instance_type: args.master_instance_type.clone(),
            count: args.core_instance_count.max(1),
            market: Market::OnDemand,
            bid_price: None,
        },
    ];
    if let Some(bid_price) = args.task_instance_bid_price {
        groups.push(InstanceGroup {
            role: InstanceRole::Task,
            instance_type: args.master_instance_type.clone(),
            count: 1,
            market: Market::Spot,
            bid_price: Some(bid_price),
        });
    }
    groups
}

async fn run_cluster(args: ClusterArgs) -> Result<()> {
    let backend = ExternalUrlBackend::new(ExternalToolConfig::default());
    let reducer_count = args.core_instance_count.max(1);
    let (_cfg, mut pipeline) =
        prepare_pipeline(&args.common, SpecBackend::Cluster, reducer_count, &backend).await?;

    for step in &mut pipeline.steps {
        step.failure_policy = failure_policy_override(step.failure_policy, args.action_on_failure);
    }
    pipeline.instance_descriptors = build_instance_groups(&args);

    let mut tags = BTreeMap::new();
    tags.insert("Application".to_string(), "railrna".to_string());
    tags.insert(
        "IntermediateLifetimeDays".to_string(),
        args.intermediate_lifetime.to_string(),
    );

    let settings = ClusterSettings {
        name: "railrna".to_string(),
        log_uri: format!("{}/logs", args.common.intermediate.trim_end_matches('/')),
        ami_version: "3.11.0".to_string(),
        tags,
        visible_to_all_users: true,
        hadoop_streaming_jar: None,
    };

    let job_flow = build_job_flow(&pipeline, &settings)
        .map_err(|err| anyhow::Error::new(err).context(exit_error::CONFIG_ERROR))?;

    println!("{}", serde_json::to_string_pretty(&job_flow)?);
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
