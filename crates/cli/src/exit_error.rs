// SPDX-License-Identifier: MIT

//! Carries the process exit code through an `anyhow::Error` chain so
//! `main` can report it without every call site threading a code around.

use std::fmt;

/// Configuration errors (validator); execution failures (step exceeded
/// retries); cancellation uses a signal-derived code instead.
#[derive(Debug, Clone, Copy)]
pub struct ExitError {
    pub code: i32,
    pub message: &'static str,
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

pub const CONFIG_ERROR: ExitError = ExitError {
    code: 1,
    message: "configuration invalid",
};

pub const EXECUTION_ERROR: ExitError = ExitError {
    code: 2,
    message: "step execution failed",
};

/// SIGINT traditionally yields 130 (128 + signal number); this driver only
/// distinguishes cancellation from other execution failures, so it always
/// reports the SIGINT-derived code regardless of which signal triggered it.
pub const CANCELLED: ExitError = ExitError {
    code: 130,
    message: "cancelled",
};
