// SPDX-License-Identifier: MIT

//! External-sort shuffle and hash partitioning, realizing the aggregation
//! contract of spec §3: equal first-`P`-field records co-locate in one
//! reducer task, in ascending full-`K`-field order within that task.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use railrna_compiler::PartitionConfig;
use tokio::process::Command;

use crate::error::ExecuteError;

/// Concatenates `inputs` and pipes them through the external sort tool,
/// sorting ascending on fields `1..=key_len` (tab-delimited). Sorting on
/// the full key in one pass gives primary ordering on the first `P`
/// fields and, for records sharing that prefix, secondary ordering on the
/// remaining fields — exactly the aggregation contract.
pub async fn sort_merge(
    inputs: &[PathBuf],
    output: &Path,
    partition: PartitionConfig,
    sort_command: &str,
    memory_cap: Option<&str>,
) -> Result<(), ExecuteError> {
    let mut cmd = Command::new(sort_command);
    cmd.arg("-t").arg("\t").arg("-s");
    for field in 1..=partition.key_len {
        cmd.arg("-k").arg(format!("{field},{field}"));
    }
    if let Some(cap) = memory_cap {
        cmd.arg("-S").arg(cap);
    }
    cmd.args(inputs);
    cmd.stdout(Stdio::from(std::fs::File::create(output)?));
    cmd.stderr(Stdio::piped());

    let output_result = cmd.output().await?;
    if !output_result.status.success() {
        return Err(ExecuteError::Step {
            step: "shuffle".to_string(),
            reason: String::from_utf8_lossy(&output_result.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Splits a sorted file into `task_count` bucket files, hash-partitioned
/// on the first `prefix_len` tab-delimited fields. Since the stream is
/// already globally sorted, appending each record to its bucket in
/// streaming order preserves intra-bucket ordering for free.
pub fn partition_sorted_file(
    sorted: &Path,
    bucket_dir: &Path,
    prefix_len: u32,
    task_count: u32,
) -> Result<Vec<PathBuf>, ExecuteError> {
    std::fs::create_dir_all(bucket_dir)?;
    let task_count = task_count.max(1);
    let mut bucket_paths = Vec::with_capacity(task_count as usize);
    let mut writers = Vec::with_capacity(task_count as usize);
    for i in 0..task_count {
        let path = bucket_dir.join(format!("part-{i:05}"));
        writers.push(std::io::BufWriter::new(std::fs::File::create(&path)?));
        bucket_paths.push(path);
    }

    let content = std::fs::read(sorted)?;
    for line in content.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let bucket = bucket_for(line, prefix_len, task_count);
        writers[bucket].write_all(line)?;
        writers[bucket].write_all(b"\n")?;
    }
    for mut w in writers {
        w.flush()?;
    }
    Ok(bucket_paths)
}

fn bucket_for(line: &[u8], prefix_len: u32, task_count: u32) -> usize {
    let prefix = first_n_fields(line, prefix_len);
    let mut hasher = DefaultHasher::new();
    prefix.hash(&mut hasher);
    (hasher.finish() % task_count as u64) as usize
}

fn first_n_fields(line: &[u8], n: u32) -> &[u8] {
    let mut seen = 0u32;
    for (i, &b) in line.iter().enumerate() {
        if b == b'\t' {
            seen += 1;
            if seen == n {
                return &line[..i];
            }
        }
    }
    line
}

#[cfg(test)]
#[path = "shuffle_tests.rs"]
mod tests;
