// SPDX-License-Identifier: MIT

//! Orchestrates the five-step parallel-backend sequence from probing
//! through the per-engine revalidation pass, and groups the resulting
//! per-engine errors by identical message per the propagation policy.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use railrna_core::{EngineId, IdGen, UrlBackend};
use railrna_spec::{ProtoStep, RunConfig, Validator};

use crate::copier::elect_copiers;
use crate::distribute::{distribute_assets, SharedAssets};
use crate::engine::Engine;
use crate::error::ProbeError;
use crate::probe::run_probe;

/// One engine's revalidation result, tagged with the host-rewritten config
/// that produced it so a caller can see which paths were checked.
pub struct EngineValidation {
    pub engine: EngineId,
    pub errors: Vec<String>,
}

/// Per §7's propagation policy: engines reporting an identical message are
/// grouped so the user sees "N hosts failed with X" once, not N times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedError {
    pub message: String,
    pub engines: Vec<EngineId>,
}

pub struct ParallelDispatcher {
    pub engines: Vec<Arc<dyn Engine>>,
}

impl ParallelDispatcher {
    pub fn new(engines: Vec<Arc<dyn Engine>>) -> Self {
        Self { engines }
    }

    /// Step 1: every engine must see the shared intermediate directory.
    pub async fn probe(
        &self,
        intermediate_dir: &Path,
        id_gen: &impl IdGen,
    ) -> Result<(), ProbeError> {
        run_probe(&self.engines, intermediate_dir, id_gen).await
    }

    /// Step 2: one copier engine per distinct host.
    pub fn elect_copiers(&self) -> BTreeMap<String, EngineId> {
        elect_copiers(&self.engines)
    }

    /// Steps 3-4: create each host's scratch directory, install the
    /// cleanup watchdog on its copier, then stage shared assets through
    /// that copier.
    pub async fn stage_assets(
        &self,
        scratch_dir: &Path,
        assets: &SharedAssets,
    ) -> Result<Vec<PathBuf>, crate::error::EngineError> {
        let copiers = self.elect_copiers();
        let engines_by_id: HashMap<EngineId, Arc<dyn Engine>> = self
            .engines
            .iter()
            .map(|e| (e.id().clone(), e.clone()))
            .collect();

        for copier_id in copiers.values() {
            let engine = &engines_by_id[copier_id];
            engine.spawn_watchdog(scratch_dir).await?;
        }

        distribute_assets(&engines_by_id, &copiers, scratch_dir, assets).await
    }

    /// Step 5: fan the validator out again, once per engine, against a
    /// host-rewritten config. `backend_for` supplies the `UrlBackend` each
    /// engine's validator pass should use (e.g. a local filesystem backend
    /// for a host the driver has already staged assets onto).
    pub async fn revalidate_per_engine(
        &self,
        configs_by_engine: &HashMap<EngineId, RunConfig>,
        protosteps: &[ProtoStep],
        backend_for: impl Fn(&EngineId) -> Arc<dyn UrlBackend>,
    ) -> Vec<EngineValidation> {
        let mut results = Vec::with_capacity(self.engines.len());
        for engine in &self.engines {
            let Some(cfg) = configs_by_engine.get(engine.id()) else {
                continue;
            };
            let backend = backend_for(engine.id());
            let validator = Validator::new(backend.as_ref());
            let (report, _manifest) = validator.validate(cfg, protosteps).await;
            results.push(EngineValidation {
                engine: engine.id().clone(),
                errors: report.errors.iter().map(|e| e.to_string()).collect(),
            });
        }
        results
    }
}

/// Groups per-engine validation results by identical error message.
pub fn group_by_message(results: &[EngineValidation]) -> Vec<GroupedError> {
    let mut grouped: BTreeMap<String, Vec<EngineId>> = BTreeMap::new();
    for result in results {
        for message in &result.errors {
            grouped
                .entry(message.clone())
                .or_default()
                .push(result.engine.clone());
        }
    }
    grouped
        .into_iter()
        .map(|(message, engines)| GroupedError { message, engines })
        .collect()
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
