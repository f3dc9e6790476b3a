// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures raised while running a compiled [`railrna_compiler::Pipeline`]
/// locally. `Task` is retried internally up to `max_task_attempts`; once
/// exhausted it becomes the `Step` variant that fails the whole run.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("task {task} of step {step:?} failed after {attempts} attempt(s); stderr tail:\n{stderr_tail}")]
    Task {
        step: String,
        task: u32,
        attempts: u32,
        stderr_tail: String,
    },

    #[error("step {step:?} failed: {reason}")]
    Step { step: String, reason: String },

    #[error("run cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
