// SPDX-License-Identifier: MIT

//! The local executor: runs a compiled [`Pipeline`] sequentially, one
//! Step at a time, each Step going through map -> shuffle -> partition ->
//! reduce.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use railrna_compiler::{Pipeline, Step};
use railrna_core::{Clock, SystemClock, Url, UrlBackend};
use tokio::sync::Semaphore;

use crate::cancellation::CancelToken;
use crate::config::ExecutorConfig;
use crate::error::ExecuteError;
use crate::shuffle::{partition_sorted_file, sort_merge};
use crate::task::run_with_retry;

/// Runs a compiled pipeline on one host. Concurrency within a phase is
/// bounded by `config.num_processes` via a `tokio::sync::Semaphore`-gated
/// pool of `tokio::process::Command` children, mirroring the teacher's
/// effect-executor pattern generalized to map/reduce task fan-out.
pub struct LocalExecutor<C: Clock = SystemClock> {
    config: ExecutorConfig,
    clock: C,
}

impl LocalExecutor<SystemClock> {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> LocalExecutor<C> {
    pub fn with_clock(config: ExecutorConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Executes every Step in order. A prior Step's output already present
    /// on disk (resume semantics) is left untouched and the Step is
    /// skipped, matching the round-trip/idempotence invariant of §8.
    pub async fn run_pipeline(
        &self,
        pipeline: &Pipeline,
        backend: &dyn UrlBackend,
        cancel: &CancelToken,
    ) -> Result<(), ExecuteError> {
        for step in &pipeline.steps {
            if cancel.is_cancelled() {
                return Err(ExecuteError::Cancelled);
            }
            if self.step_already_complete(step, backend).await {
                tracing::info!(step = %step.name, "skipping already-complete step");
                continue;
            }
            self.run_step(step, backend, cancel).await?;
        }
        Ok(())
    }

    async fn step_already_complete(&self, step: &Step, backend: &dyn UrlBackend) -> bool {
        if let Some(path) = step.output.as_path() {
            return path.is_dir()
                && std::fs::read_dir(path)
                    .map(|mut entries| entries.next().is_some())
                    .unwrap_or(false);
        }
        matches!(backend.exists(&step.output).await, Ok(true))
            && matches!(backend.is_dir(&step.output).await, Ok(true))
    }

    async fn run_step(
        &self,
        step: &Step,
        backend: &dyn UrlBackend,
        cancel: &CancelToken,
    ) -> Result<(), ExecuteError> {
        let span = tracing::info_span!("step", step = %step.name);
        let _guard = span.enter();
        tracing::info!(task_count = step.task_count, "starting step");

        let scratch = self.config.scratch_dir.join(&step.name);
        tokio::fs::create_dir_all(&scratch).await?;

        let result = self.run_step_inner(step, backend, &scratch, cancel).await;

        if !self.config.keep_intermediates {
            let _ = tokio::fs::remove_dir_all(&scratch).await;
        }

        result
    }

    async fn run_step_inner(
        &self,
        step: &Step,
        backend: &dyn UrlBackend,
        scratch: &Path,
        cancel: &CancelToken,
    ) -> Result<(), ExecuteError> {
        let inputs_dir = scratch.join("inputs");
        tokio::fs::create_dir_all(&inputs_dir).await?;
        let mut local_inputs = Vec::with_capacity(step.inputs.len());
        for url in &step.inputs {
            local_inputs.push(self.materialize_input(url, &inputs_dir, backend).await?);
        }

        let map_dir = scratch.join("map");
        tokio::fs::create_dir_all(&map_dir).await?;
        let split_count = if step.partition.is_some() {
            self.config.num_processes.max(1)
        } else {
            step.task_count.max(1) as usize
        };
        let groups = split_round_robin(&local_inputs, split_count);

        let map_outputs = self
            .run_phase(&step.name, &step.mapper_command, &groups, &map_dir, cancel)
            .await?;

        let output_dir = scratch.join("output");
        tokio::fs::create_dir_all(&output_dir).await?;

        match step.partition {
            None => {
                move_parts_into(map_outputs, &output_dir).await?;
            }
            Some(partition) => {
                let sorted = scratch.join("sorted");
                sort_merge(
                    &map_outputs,
                    &sorted,
                    partition,
                    &self.config.sort_command,
                    self.config.sort_memory_cap.as_deref(),
                )
                .await?;

                let bucket_dir = scratch.join("buckets");
                let buckets = partition_sorted_file(
                    &sorted,
                    &bucket_dir,
                    partition.prefix_len,
                    step.task_count,
                )?;

                let bucket_groups: Vec<Vec<PathBuf>> =
                    buckets.into_iter().map(|p| vec![p]).collect();

                // Reducer tasks write their concatenated input alongside
                // their output (see run_phase); keep those confined to a
                // scratch subdir so only part-* files ever reach output_dir.
                let reduce_dir = scratch.join("reduce");
                tokio::fs::create_dir_all(&reduce_dir).await?;
                let reduce_outputs = self
                    .run_phase(
                        &step.name,
                        &step.reducer_command,
                        &bucket_groups,
                        &reduce_dir,
                        cancel,
                    )
                    .await?;
                move_parts_into(reduce_outputs, &output_dir).await?;
            }
        }

        self.materialize_output_dir(&output_dir, &step.output, backend)
            .await?;

        Ok(())
    }

    /// Runs one operator phase (map or reduce) across `groups`, each group
    /// becoming one task, bounded by `num_processes` concurrent children.
    async fn run_phase(
        &self,
        step_name: &str,
        command: &str,
        groups: &[Vec<PathBuf>],
        phase_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<Vec<PathBuf>, ExecuteError> {
        let semaphore = Arc::new(Semaphore::new(self.config.num_processes.max(1)));
        let mut handles = Vec::with_capacity(groups.len());

        for (idx, group) in groups.iter().enumerate() {
            let concat_input = phase_dir.join(format!("task-{idx:05}-in"));
            concat_files(group, &concat_input)?;

            let output_path = phase_dir.join(format!("part-{idx:05}"));
            let command = command.to_string();
            let step_name = step_name.to_string();
            let semaphore = semaphore.clone();
            let clock = self.clock.clone();
            let gzip = self.config.gzip_intermediates.then_some(self.config.gzip_level);
            let max_attempts = self.config.max_task_attempts;

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                run_with_retry(
                    &step_name,
                    idx as u32,
                    &command,
                    &concat_input,
                    &output_path,
                    max_attempts,
                    &clock,
                )
                .await?;
                if let Some(level) = gzip {
                    gzip_in_place(&output_path, level)?;
                }
                Ok::<PathBuf, ExecuteError>(output_path)
            }));
        }

        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            if cancel.is_cancelled() {
                return Err(ExecuteError::Cancelled);
            }
            outputs.push(handle.await.map_err(|e| ExecuteError::Step {
                step: step_name.to_string(),
                reason: format!("task join error: {e}"),
            })??);
        }
        Ok(outputs)
    }

    async fn materialize_input(
        &self,
        url: &Url,
        dest_dir: &Path,
        backend: &dyn UrlBackend,
    ) -> Result<PathBuf, ExecuteError> {
        if let Some(path) = url.as_path() {
            return Ok(path.to_path_buf());
        }
        backend
            .get(url, dest_dir)
            .await
            .map_err(|e| ExecuteError::Step {
                step: "materialize-input".to_string(),
                reason: e.to_string(),
            })?;
        Ok(dest_dir.join(url.basename()))
    }

    async fn materialize_output_dir(
        &self,
        local_dir: &Path,
        url: &Url,
        backend: &dyn UrlBackend,
    ) -> Result<(), ExecuteError> {
        if let Some(path) = url.as_path() {
            tokio::fs::create_dir_all(path).await?;
            let mut entries = tokio::fs::read_dir(local_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let dest = path.join(entry.file_name());
                tokio::fs::copy(entry.path(), dest).await?;
            }
            return Ok(());
        }
        let mut entries = tokio::fs::read_dir(local_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let part_url = url.join(&entry.file_name().to_string_lossy());
            backend
                .put(&entry.path(), &part_url)
                .await
                .map_err(|e| ExecuteError::Step {
                    step: "materialize-output".to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// Renames each task output to `part-{i:05}` under `output_dir`, the only
/// files a phase is allowed to leave where [`LocalExecutor::materialize_output_dir`]
/// will find them.
async fn move_parts_into(outputs: Vec<PathBuf>, output_dir: &Path) -> Result<(), ExecuteError> {
    for (i, path) in outputs.into_iter().enumerate() {
        let dest = output_dir.join(format!("part-{i:05}"));
        tokio::fs::rename(&path, &dest)
            .await
            .or_else(|_| std::fs::copy(&path, &dest).map(|_| ()))?;
    }
    Ok(())
}

fn split_round_robin(items: &[PathBuf], n: usize) -> Vec<Vec<PathBuf>> {
    let n = n.max(1);
    let mut groups: Vec<Vec<PathBuf>> = (0..n).map(|_| Vec::new()).collect();
    for (i, item) in items.iter().enumerate() {
        groups[i % n].push(item.clone());
    }
    groups.retain(|g| !g.is_empty());
    if groups.is_empty() {
        groups.push(Vec::new());
    }
    groups
}

fn concat_files(paths: &[PathBuf], dest: &Path) -> Result<(), ExecuteError> {
    use std::io::Write;
    let mut out = std::io::BufWriter::new(std::fs::File::create(dest)?);
    for path in paths {
        let contents = std::fs::read(path)?;
        out.write_all(&contents)?;
    }
    Ok(())
}

fn gzip_in_place(path: &Path, level: u32) -> Result<(), ExecuteError> {
    let raw = std::fs::read(path)?;
    let file = std::fs::File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::new(level));
    std::io::Write::write_all(&mut encoder, &raw)?;
    encoder.finish()?;
    Ok(())
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
