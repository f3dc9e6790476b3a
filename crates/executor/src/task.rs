// SPDX-License-Identifier: MIT

//! Running one shell-out task (map or reduce) with retry.

use std::path::Path;
use std::process::Stdio;

use railrna_core::Clock;
use tokio::fs::File;
use tokio::process::Command;

use crate::error::ExecuteError;

const STDERR_TAIL_LINES: usize = 20;

/// Runs `command` via `sh -c`, reading `stdin_path` and writing
/// `stdout_path`, retrying up to `max_attempts` times on non-zero exit.
/// Mirrors the teacher's effect-executor pattern of spawning a
/// `tokio::process::Command` and awaiting its `Output` inside a tracked
/// span, generalized here to cover retry.
pub async fn run_with_retry(
    step: &str,
    task: u32,
    command: &str,
    stdin_path: &Path,
    stdout_path: &Path,
    max_attempts: u32,
    clock: &impl Clock,
) -> Result<(), ExecuteError> {
    let span = tracing::info_span!("task", step, task, command);
    let _guard = span.enter();

    let mut last_stderr = String::new();
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let start = clock.now();
        match run_once(command, stdin_path, stdout_path).await {
            Ok(()) => {
                tracing::info!(
                    attempt,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "task completed"
                );
                return Ok(());
            }
            Err(stderr) => {
                tracing::warn!(attempt, max_attempts, "task attempt failed");
                last_stderr = stderr;
            }
        }
    }

    Err(ExecuteError::Task {
        step: step.to_string(),
        task,
        attempts: max_attempts,
        stderr_tail: tail_lines(&last_stderr, STDERR_TAIL_LINES),
    })
}

async fn run_once(command: &str, stdin_path: &Path, stdout_path: &Path) -> Result<(), String> {
    let stdin_file = File::open(stdin_path)
        .await
        .map_err(|e| format!("opening input {}: {e}", stdin_path.display()))?;
    let stdout_file = File::create(stdout_path)
        .await
        .map_err(|e| format!("creating output {}: {e}", stdout_path.display()))?;

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::from(stdin_file.into_std().await))
        .stdout(Stdio::from(stdout_file.into_std().await))
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("spawning {command:?}: {e}"))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).into_owned())
    }
}

fn tail_lines(s: &str, n: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
