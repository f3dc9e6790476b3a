// SPDX-License-Identifier: MIT

//! Declarative pipeline stage description, read before compilation.

use indexmap::IndexMap;
use thiserror::Error;

use railrna_core::Url;

/// The externally-implemented streaming transform that gives a stage its
/// meaning. Identified purely by name and a command-line template; this
/// crate never interprets what the operator does or emits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamingOperator {
    pub name: String,
    /// Command-line template. `{task_count}` is substituted by the compiler.
    pub command_template: String,
}

/// One input to a protostep: either the logical output name of a prior
/// stage, or a path/URL external to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StepInput {
    Logical(String),
    External(Url),
}

/// A protostep's output: a logical name resolved by later steps, or an
/// external path written directly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StepOutput {
    Logical(String),
    External(Url),
}

/// Boolean switches a protostep may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProtoStepFlags {
    pub multiple_outputs: bool,
    pub index_output: bool,
    pub direct_copy_to_final: bool,
    pub no_input_prefix: bool,
    pub no_output_prefix: bool,
}

/// Whether a protostep's operator runs pre-shuffle (map-only) or
/// post-shuffle (reduce), determined solely by whether `keys_per_record`
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    MapOnly,
    Reduce,
}

/// Declarative description of one pipeline stage before compilation.
///
/// All fields beyond `name`/`program`/`inputs`/`output` are optional —
/// protosteps vary widely in which knobs they carry (archives, multiple
/// outputs, task multiplier vs. min/max tasks).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProtoStep {
    pub name: String,
    pub program: StreamingOperator,
    pub inputs: Vec<StepInput>,
    pub output: StepOutput,
    pub keys_per_record: Option<u32>,
    pub partition_prefix_len: Option<u32>,
    pub task_multiplier: Option<u32>,
    pub min_tasks: Option<u32>,
    pub max_tasks: Option<u32>,
    pub archive: Option<Url>,
    pub input_format: Option<String>,
    #[serde(default)]
    pub flags: ProtoStepFlags,
    #[serde(default)]
    pub extra_config: IndexMap<String, String>,
}

/// Invariant violations a `ProtoStep` can carry, caught before compilation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtoStepError {
    #[error("protostep {name:?}: partition-prefix-length {p} exceeds keys-per-record {k}")]
    PartitionPrefixExceedsKeys { name: String, p: u32, k: u32 },

    #[error("protostep {name:?}: partition-prefix-length must be >= 1 for a reducing step")]
    PartitionPrefixZero { name: String },

    #[error(
        "protostep {name:?}: multiple-outputs and direct-copy-to-final are mutually exclusive"
    )]
    MutuallyExclusiveOutputFlags { name: String },
}

impl ProtoStep {
    /// `MapOnly` when `keys_per_record` is unset: the operator runs as the
    /// mapper and the reducer is identity. `Reduce` otherwise: the mapper
    /// is identity and the operator runs as the reducer after shuffle.
    pub fn op_kind(&self) -> OpKind {
        if self.keys_per_record.is_some() {
            OpKind::Reduce
        } else {
            OpKind::MapOnly
        }
    }

    /// Checks invariants (a) `P <= K` (and `P >= 1` for reducing steps) and
    /// (d) `multiple_outputs` / `direct_copy_to_final` mutual exclusion.
    /// Returns every violation rather than stopping at the first.
    pub fn validate(&self) -> Vec<ProtoStepError> {
        let mut errors = Vec::new();

        if self.flags.multiple_outputs && self.flags.direct_copy_to_final {
            errors.push(ProtoStepError::MutuallyExclusiveOutputFlags {
                name: self.name.clone(),
            });
        }

        if self.op_kind() == OpKind::Reduce {
            let k = self.keys_per_record.unwrap_or(0);
            match self.partition_prefix_len {
                Some(0) => errors.push(ProtoStepError::PartitionPrefixZero {
                    name: self.name.clone(),
                }),
                Some(p) if p > k => errors.push(ProtoStepError::PartitionPrefixExceedsKeys {
                    name: self.name.clone(),
                    p,
                    k,
                }),
                None => errors.push(ProtoStepError::PartitionPrefixZero {
                    name: self.name.clone(),
                }),
                _ => {}
            }
        }

        errors
    }
}

#[cfg(test)]
#[path = "protostep_tests.rs"]
mod tests;
