// SPDX-License-Identifier: MIT

//! Compiled pipeline types: the output of [`crate::compile::PipelineCompiler`].

use railrna_core::Url;

/// Partitioner/comparator configuration for a reducing Step, realizing the
/// aggregation contract: records sharing the first `prefix_len` fields
/// co-locate in one reducer task, ordered ascending on the full
/// `key_len`-field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartitionConfig {
    pub prefix_len: u32,
    pub key_len: u32,
}

/// How a Step's exit status affects the run (and, on the cluster backend,
/// the hosted cluster itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailurePolicy {
    TerminateAll,
    CancelAndWait,
    Continue,
    TerminateCluster,
}

/// A compiled stage: concrete commands plus shuffle configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    pub name: String,
    pub mapper_command: String,
    pub reducer_command: String,
    pub task_count: u32,
    pub partition: Option<PartitionConfig>,
    pub inputs: Vec<Url>,
    pub output: Url,
    pub failure_policy: FailurePolicy,
    pub archive: Option<Url>,
    pub index_output: bool,
    pub input_format: Option<String>,
    pub multiple_outputs: bool,
    pub extra_config: Vec<(String, String)>,
}

/// An action run on every cluster node before any Step executes (install
/// toolchain, stage reference archive, stage manifest).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapAction {
    pub name: String,
    pub script_path: Url,
    pub args: Vec<String>,
}

/// Which role an instance group plays in a hosted cluster. Instance-group
/// fields are always appended and consulted by role, never by a fixed list
/// index — a master group always exists, core and task groups are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceRole {
    Master,
    Core,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Market {
    OnDemand,
    Spot,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstanceGroup {
    pub role: InstanceRole,
    pub instance_type: String,
    pub count: u32,
    pub market: Market,
    pub bid_price: Option<f64>,
}

/// Ordered list of Steps plus cluster-only bootstrap/instance metadata.
/// Step `i` may reference any output of step `j < i`; the compiler enforces
/// this by construction.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pipeline {
    pub steps: Vec<Step>,
    pub bootstrap_actions: Vec<BootstrapAction>,
    pub instance_descriptors: Vec<InstanceGroup>,
}
