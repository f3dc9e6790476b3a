// SPDX-License-Identifier: MIT

use std::path::PathBuf;

/// Local executor tuning, mirroring the CLI flags of the same name.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// `-p/--num-processes`: bounds how many mapper/reducer children run
    /// concurrently within a phase.
    pub num_processes: usize,
    pub max_task_attempts: u32,
    pub gzip_intermediates: bool,
    pub gzip_level: u32,
    /// Passed to the external sort tool as its memory-cap flag argument,
    /// e.g. `Some("2G")` becomes `sort -S 2G`.
    pub sort_memory_cap: Option<String>,
    pub scratch_dir: PathBuf,
    pub sort_command: String,
    pub keep_intermediates: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            num_processes: 1,
            max_task_attempts: 1,
            gzip_intermediates: false,
            gzip_level: 6,
            sort_memory_cap: None,
            scratch_dir: std::env::temp_dir().join("railrna-scratch"),
            sort_command: "sort".to_string(),
            keep_intermediates: false,
        }
    }
}
