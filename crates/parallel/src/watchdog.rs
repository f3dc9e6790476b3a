// SPDX-License-Identifier: MIT

//! The poll-script cleanup fallback for engines outside the driver's own
//! process tree: a shell loop that watches its parent's parent PID and
//! removes the scratch directory once that PID goes to 1.

use std::path::Path;

use crate::engine::RemoteEngine;
use crate::error::EngineError;

/// Builds the watchdog shell script. Kept as a standalone function so its
/// exact text is unit-testable without a live SSH session.
pub fn poll_script(scratch_dir: &Path) -> String {
    format!(
        "nohup sh -c 'while true; do \
         ppid=$(ps -o ppid= -p $PPID 2>/dev/null | tr -d \" \"); \
         if [ -z \"$ppid\" ] || [ \"$ppid\" = \"1\" ]; then \
         rm -rf {dir}; exit 0; fi; sleep 5; done' >/dev/null 2>&1 &",
        dir = shell_quote(scratch_dir)
    )
}

fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "'\\''"))
}

pub(crate) async fn spawn_poll_script(
    engine: &RemoteEngine,
    scratch_dir: &Path,
) -> Result<(), EngineError> {
    engine.run_remote_command(&poll_script(scratch_dir)).await
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
