// SPDX-License-Identifier: MIT

//! Protostep -> Step compilation.

use std::collections::HashMap;

use railrna_core::Url;
use railrna_spec::{Backend, OpKind, ProtoStep, StepInput, StepOutput};

use crate::error::CompileError;
use crate::types::{FailurePolicy, PartitionConfig, Pipeline, Step};

const IDENTITY_COMMAND: &str = "cat";

/// Compiles a declarative protostep list into a concrete [`Pipeline`].
///
/// `compile` is a pure function of its inputs — no IDs, no clock, no RNG —
/// so the same protostep list always compiles to a byte-identical Step
/// list.
pub struct PipelineCompiler;

impl PipelineCompiler {
    /// `reducer_count` is the cluster's total reducer-slot count on the
    /// cluster backend, or the user's process count on local/parallel
    /// backends. `intermediate_dir` is where logical-name outputs land;
    /// `final_output_dir` is where a protostep with `no_output_prefix`
    /// writes directly. A logical input with `no_input_prefix` set skips
    /// the producer lookup entirely and is parsed as a literal URL instead.
    pub fn compile(
        protosteps: &[ProtoStep],
        reducer_count: u32,
        intermediate_dir: &Url,
        final_output_dir: &Url,
        backend: Backend,
    ) -> Result<Pipeline, Vec<CompileError>> {
        let mut errors: Vec<CompileError> = protosteps
            .iter()
            .flat_map(|p| p.validate().into_iter().map(CompileError::from))
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut outputs: HashMap<String, Url> = HashMap::new();
        let mut steps = Vec::with_capacity(protosteps.len());

        for protostep in protosteps {
            let mut input_urls = Vec::with_capacity(protostep.inputs.len());
            for input in &protostep.inputs {
                match input {
                    StepInput::External(url) => input_urls.push(url.clone()),
                    StepInput::Logical(name) if protostep.flags.no_input_prefix => {
                        input_urls.push(Url::parse(name.clone()));
                    }
                    StepInput::Logical(name) => match outputs.get(name) {
                        Some(url) => input_urls.push(url.clone()),
                        None => errors.push(CompileError::UnknownLogicalInput {
                            step: protostep.name.clone(),
                            name: name.clone(),
                        }),
                    },
                }
            }

            let output_url = match &protostep.output {
                StepOutput::External(url) => url.clone(),
                StepOutput::Logical(name) => {
                    let base = if protostep.flags.no_output_prefix {
                        final_output_dir
                    } else {
                        intermediate_dir
                    };
                    let resolved = base.join(name);
                    outputs.insert(name.clone(), resolved.clone());
                    resolved
                }
            };

            if !errors.is_empty() {
                continue;
            }

            let task_count = task_count_for(protostep, reducer_count);

            let (mapper_command, reducer_command, partition) = match protostep.op_kind() {
                OpKind::MapOnly => (
                    render_template(&protostep.program.command_template, task_count),
                    String::new(),
                    None,
                ),
                OpKind::Reduce => {
                    let k = protostep.keys_per_record.unwrap_or(0);
                    let p = protostep.partition_prefix_len.unwrap_or(0);
                    (
                        IDENTITY_COMMAND.to_string(),
                        render_template(&protostep.program.command_template, task_count),
                        Some(PartitionConfig {
                            prefix_len: p,
                            key_len: k,
                        }),
                    )
                }
            };

            let failure_policy = FailurePolicy::TerminateAll;

            let extra_config: Vec<(String, String)> = protostep
                .extra_config
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            let stages_output_to_object_store = backend == Backend::Cluster
                && output_url.is_object_store()
                && !protostep.flags.direct_copy_to_final;

            if stages_output_to_object_store {
                let staging = Url::parse(format!("hdfs:///rail-staging/{}", protostep.name));
                steps.push(Step {
                    name: protostep.name.clone(),
                    mapper_command: mapper_command.clone(),
                    reducer_command: reducer_command.clone(),
                    task_count,
                    partition,
                    inputs: input_urls.clone(),
                    output: staging.clone(),
                    failure_policy,
                    archive: protostep.archive.clone(),
                    index_output: false,
                    input_format: protostep.input_format.clone(),
                    multiple_outputs: protostep.flags.multiple_outputs,
                    extra_config: extra_config.clone(),
                });
                steps.push(Step {
                    name: format!("{}-copy-to-final", protostep.name),
                    mapper_command: "copy-to-final".to_string(),
                    reducer_command: String::new(),
                    task_count: 1,
                    partition: None,
                    inputs: vec![staging],
                    output: output_url.clone(),
                    failure_policy: FailurePolicy::TerminateAll,
                    archive: None,
                    index_output: false,
                    input_format: None,
                    multiple_outputs: false,
                    extra_config: Vec::new(),
                });
            } else {
                steps.push(Step {
                    name: protostep.name.clone(),
                    mapper_command,
                    reducer_command,
                    task_count,
                    partition,
                    inputs: input_urls,
                    output: output_url.clone(),
                    failure_policy,
                    archive: protostep.archive.clone(),
                    index_output: protostep.flags.index_output,
                    input_format: protostep.input_format.clone(),
                    multiple_outputs: protostep.flags.multiple_outputs,
                    extra_config,
                });
            }

            if protostep.flags.index_output && backend == Backend::Cluster {
                steps.push(Step {
                    name: format!("{}-index", protostep.name),
                    mapper_command: "index-splittable-output".to_string(),
                    reducer_command: String::new(),
                    task_count: 1,
                    partition: None,
                    inputs: vec![output_url.clone()],
                    output: output_url,
                    failure_policy: FailurePolicy::Continue,
                    archive: None,
                    index_output: false,
                    input_format: None,
                    multiple_outputs: false,
                    extra_config: Vec::new(),
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Pipeline {
            steps,
            bootstrap_actions: Vec::new(),
            instance_descriptors: Vec::new(),
        })
    }
}

/// `T = R*m` when `task_multiplier = Some(m)`; `T = 1` when `min_tasks` is
/// also unset; otherwise `min_tasks` rounded up to the next multiple of
/// `R`, clipped to `max_tasks` if set.
fn task_count_for(protostep: &ProtoStep, reducer_count: u32) -> u32 {
    if let Some(m) = protostep.task_multiplier {
        return reducer_count.saturating_mul(m).max(1);
    }
    let Some(min_tasks) = protostep.min_tasks else {
        return 1;
    };
    let r = reducer_count.max(1) as u64;
    let min_tasks = min_tasks as u64;
    let rounded = ((min_tasks + r - 1) / r) * r;
    let clipped = match protostep.max_tasks {
        Some(max) => rounded.min(max as u64),
        None => rounded,
    };
    clipped.max(1) as u32
}

fn render_template(template: &str, task_count: u32) -> String {
    template.replace("{task_count}", &task_count.to_string())
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
