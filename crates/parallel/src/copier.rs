// SPDX-License-Identifier: MIT

//! Step 2: partition engines by host and elect one "copier" engine per
//! host — the one that actually fetches shared assets, with the rest
//! reading from its local copy.

use std::collections::BTreeMap;
use std::sync::Arc;

use railrna_core::EngineId;

use crate::engine::Engine;

/// Maps each distinct host to the engine elected to copy assets in for
/// that host. Election is deterministic: the lexicographically smallest
/// engine ID on each host wins, so repeated runs over the same engine set
/// always agree.
pub fn elect_copiers(engines: &[Arc<dyn Engine>]) -> BTreeMap<String, EngineId> {
    let mut by_host: BTreeMap<String, &EngineId> = BTreeMap::new();
    for engine in engines {
        by_host
            .entry(engine.host().to_string())
            .and_modify(|current| {
                if engine.id().as_str() < current.as_str() {
                    *current = engine.id();
                }
            })
            .or_insert_with(|| engine.id());
    }
    by_host
        .into_iter()
        .map(|(host, id)| (host, id.clone()))
        .collect()
}

#[cfg(test)]
#[path = "copier_tests.rs"]
mod tests;
