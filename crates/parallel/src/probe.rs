// SPDX-License-Identifier: MIT

//! Step 1 of the parallel dispatcher: every engine must see the same
//! shared intermediate directory before anything else runs. A single
//! randomly named probe file is written once, then checked for existence
//! from each engine's own vantage point.

use std::path::Path;
use std::sync::Arc;

use railrna_core::IdGen;

use crate::engine::Engine;
use crate::error::ProbeError;

/// Writes one probe file into `intermediate_dir` (via the first engine)
/// and checks every engine can see it. Returns the names of engines that
/// cannot, in the exact order `engines` was given.
pub async fn run_probe(
    engines: &[Arc<dyn Engine>],
    intermediate_dir: &Path,
    id_gen: &impl IdGen,
) -> Result<(), ProbeError> {
    if engines.is_empty() {
        return Ok(());
    }
    let probe_name = format!("railrna-probe-{}", id_gen.next());
    let probe_path = intermediate_dir.join(&probe_name);

    engines[0]
        .write_file(&probe_path, b"probe")
        .await
        .map_err(|_| ProbeError {
            unreachable: vec![engines[0].id().clone()],
        })?;

    let mut unreachable = Vec::new();
    for engine in engines {
        let seen = engine.file_exists(&probe_path).await.unwrap_or(false);
        if !seen {
            unreachable.push(engine.id().clone());
        }
    }

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(ProbeError { unreachable })
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
