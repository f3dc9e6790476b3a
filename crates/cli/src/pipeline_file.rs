// SPDX-License-Identifier: MIT

//! Loads the declarative protostep chain a run compiles, from a TOML file
//! naming one `[[step]]` table per stage.

use std::path::Path;

use anyhow::{Context, Result};
use railrna_spec::ProtoStep;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PipelineFile {
    #[serde(rename = "step")]
    steps: Vec<ProtoStep>,
}

pub fn load_protosteps(path: &Path) -> Result<Vec<ProtoStep>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading pipeline file {}", path.display()))?;
    let parsed: PipelineFile = toml::from_str(&text)
        .with_context(|| format!("parsing pipeline file {}", path.display()))?;
    Ok(parsed.steps)
}

#[cfg(test)]
#[path = "pipeline_file_tests.rs"]
mod tests;
