// SPDX-License-Identifier: MIT

//! Translates parsed CLI arguments into the validator's [`RunConfig`].

use anyhow::{Context, Result};
use railrna_core::Url;
use railrna_spec::{Backend, Dependency, IndexSpec, ProtoStep, RunConfig};

use crate::cli::CommonArgs;

/// Builds the validator's [`RunConfig`], including the dependency and
/// index lists derived from `protosteps`: the `sort` binary the executor
/// always shells out to (check 4), and a reference-index existence check
/// for every protostep that carries a side-input `archive` (check 5). A
/// protostep's `program.name` is a label, not necessarily the literal
/// executable `command_template` invokes, so it is not checked here.
pub fn build_run_config(args: &CommonArgs, backend: Backend, protosteps: &[ProtoStep]) -> Result<RunConfig> {
    let manifest_text = match std::fs::read_to_string(&args.manifest) {
        Ok(text) => Some(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| {
                format!("reading manifest {}", args.manifest.display())
            })
        }
    };

    let output = Url::parse(args.output.clone());
    let uses_object_store = output.is_object_store();

    Ok(RunConfig {
        backend,
        manifest_text,
        manifest_source: args.manifest.display().to_string(),
        output,
        force: args.force,
        preprocess_mode: false,
        num_processes: args.num_processes,
        max_task_attempts: args.max_task_attempts,
        gzip_intermediates: args.gzip_intermediates,
        gzip_level: args.gzip_level,
        sort_memory_cap: args.sort_memory_cap,
        dependencies: vec![Dependency {
            name: "sort".to_string(),
            user_supplied_path: None,
        }],
        indexes: indexes_for(protosteps),
        path_dirs: std::env::var("PATH")
            .map(|p| std::env::split_paths(&p).map(|d| d.display().to_string()).collect())
            .unwrap_or_default(),
        uses_object_store,
        has_credentials: std::env::var("AWS_ACCESS_KEY_ID").is_ok()
            && std::env::var("AWS_SECRET_ACCESS_KEY").is_ok(),
        has_http_client: which_curl(),
    })
}

/// One [`IndexSpec`] per protostep `archive`, splitting the archive path
/// into a basename and its extension so check 5 confirms the declared
/// side-input actually exists before a run starts.
fn indexes_for(protosteps: &[ProtoStep]) -> Vec<IndexSpec> {
    protosteps
        .iter()
        .filter_map(|step| step.archive.as_ref())
        .filter_map(split_basename_and_extension)
        .collect()
}

fn split_basename_and_extension(archive: &Url) -> Option<IndexSpec> {
    let raw = archive.to_display();
    let name_start = raw.rfind('/').map(|i| i + 1).unwrap_or(0);
    let dot = raw[name_start..].find('.')?;
    let dot = name_start + dot;
    Some(IndexSpec {
        basename: Url::parse(raw[..dot].to_string()),
        required_extensions: vec![raw[dot + 1..].to_string()],
    })
}

fn which_curl() -> bool {
    std::env::var("PATH")
        .map(|path| {
            std::env::split_paths(&path).any(|dir| dir.join("curl").is_file())
        })
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
