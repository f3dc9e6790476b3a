// SPDX-License-Identifier: MIT

use railrna_core::EngineId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine {engine}: io error: {source}")]
    Io {
        engine: EngineId,
        #[source]
        source: std::io::Error,
    },
    #[error("engine {engine}: command {command:?} exited with status {status}")]
    CommandFailed {
        engine: EngineId,
        command: String,
        status: i32,
    },
}

/// The probe-file check failed: one or more engines could not see the file
/// written into the shared intermediate directory.
#[derive(Debug, Error)]
#[error("probe file not visible from engine(s): {}", unreachable.iter().map(|e| e.as_str()).collect::<Vec<_>>().join(", "))]
pub struct ProbeError {
    pub unreachable: Vec<EngineId>,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
