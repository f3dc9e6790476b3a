// SPDX-License-Identifier: MIT

//! Step 4: copy the code archive, manifest, and (unless suppressed)
//! reference indexes into each host's scratch directory, through that
//! host's elected copier engine.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use railrna_core::EngineId;

use crate::engine::Engine;
use crate::error::EngineError;

/// Assets shared verbatim across every worker host before a run starts.
pub struct SharedAssets {
    pub code_archive: PathBuf,
    pub manifest: PathBuf,
    pub indexes: Vec<PathBuf>,
    pub suppress_indexes: bool,
}

/// Copies `assets` into `scratch_dir` on every host via that host's
/// copier, returning the local path each asset landed at (same relative
/// layout on every host, so callers can rewrite URLs mechanically).
pub async fn distribute_assets(
    engines_by_id: &HashMap<EngineId, Arc<dyn Engine>>,
    copiers: &BTreeMap<String, EngineId>,
    scratch_dir: &Path,
    assets: &SharedAssets,
) -> Result<Vec<PathBuf>, EngineError> {
    let mut staged = Vec::new();
    for copier_id in copiers.values() {
        #[allow(clippy::expect_used)]
        let engine = engines_by_id
            .get(copier_id)
            .expect("copier id came from the same engine set");
        engine.make_dir(scratch_dir).await?;

        let mut to_copy = vec![&assets.code_archive, &assets.manifest];
        if !assets.suppress_indexes {
            to_copy.extend(assets.indexes.iter());
        }
        for src in to_copy {
            #[allow(clippy::expect_used)]
            let dest = scratch_dir.join(src.file_name().expect("asset has a file name"));
            engine.copy_in(src, &dest).await?;
            staged.push(dest);
        }
    }
    staged.sort();
    staged.dedup();
    Ok(staged)
}

#[cfg(test)]
#[path = "distribute_tests.rs"]
mod tests;
