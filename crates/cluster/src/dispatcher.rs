// SPDX-License-Identifier: MIT

//! Builds a job-flow descriptor from a compiled [`Pipeline`], mirroring the
//! hosted-cluster step-argument assembly of the driver this crate is based
//! on (Hadoop Streaming `-D`/`-input`/`-output`/`-mapper`/`-reducer`
//! arguments, a `KeyFieldBasedPartitioner` keyed on the partition prefix).

use std::collections::BTreeMap;

use railrna_compiler::{FailurePolicy, Pipeline};

use crate::descriptor::{
    ActionOnFailure, BootstrapActionDescriptor, HadoopJarStep, InstanceGroupDescriptor,
    InstancesDescriptor, JobFlowDescriptor, StepDescriptor,
};
use crate::error::ClusterError;
use crate::instance_capacity::capacity_for;

const DEFAULT_HADOOP_STREAMING_JAR: &str =
    "/usr/lib/hadoop-mapreduce/hadoop-streaming.jar";
const PARTITIONER_CLASS: &str = "org.apache.hadoop.mapred.lib.KeyFieldBasedPartitioner";
const MULTIPLE_OUTPUT_FORMAT_CLASS: &str = "edu.jhu.cs.MultipleOutputFormat";

/// Cluster-level settings that aren't derivable from the compiled pipeline:
/// naming, logging, AMI pinning, tags, and visibility.
#[derive(Debug, Clone)]
pub struct ClusterSettings {
    pub name: String,
    pub log_uri: String,
    pub ami_version: String,
    pub tags: BTreeMap<String, String>,
    pub visible_to_all_users: bool,
    pub hadoop_streaming_jar: Option<String>,
}

impl FailurePolicy {
    fn to_action_on_failure(self) -> ActionOnFailure {
        match self {
            FailurePolicy::TerminateAll => ActionOnFailure::TerminateAll,
            FailurePolicy::CancelAndWait => ActionOnFailure::CancelAndWait,
            FailurePolicy::Continue => ActionOnFailure::Continue,
            FailurePolicy::TerminateCluster => ActionOnFailure::TerminateCluster,
        }
    }
}

/// Builds a [`JobFlowDescriptor`] from a compiled pipeline. Validates that
/// every instance group names a known instance type so the per-worker
/// memory/vcore figures in `DESIGN.md`'s grounding can actually be computed
/// downstream by the bootstrap action that configures YARN.
pub fn build_job_flow(
    pipeline: &Pipeline,
    settings: &ClusterSettings,
) -> Result<JobFlowDescriptor, ClusterError> {
    let mut instance_groups = Vec::with_capacity(pipeline.instance_descriptors.len());
    for group in &pipeline.instance_descriptors {
        if capacity_for(&group.instance_type).is_none() {
            return Err(ClusterError::UnknownInstanceType {
                instance_type: group.instance_type.clone(),
            });
        }
        instance_groups.push(InstanceGroupDescriptor::from(group));
    }

    let bootstrap_actions = pipeline
        .bootstrap_actions
        .iter()
        .map(|action| BootstrapActionDescriptor {
            name: action.name.clone(),
            path: action.script_path.to_display().to_string(),
            args: action.args.clone(),
        })
        .collect();

    let jar = settings
        .hadoop_streaming_jar
        .clone()
        .unwrap_or_else(|| DEFAULT_HADOOP_STREAMING_JAR.to_string());

    let steps = pipeline
        .steps
        .iter()
        .map(|step| StepDescriptor {
            name: step.name.clone(),
            action_on_failure: step.failure_policy.to_action_on_failure(),
            hadoop_jar_step: HadoopJarStep {
                jar: jar.clone(),
                args: build_step_args(step),
            },
        })
        .collect();

    Ok(JobFlowDescriptor {
        name: settings.name.clone(),
        log_uri: settings.log_uri.clone(),
        ami_version: settings.ami_version.clone(),
        tags: settings.tags.clone(),
        visible_to_all_users: settings.visible_to_all_users.to_string(),
        instances: InstancesDescriptor { instance_groups },
        bootstrap_actions,
        steps,
    })
}

fn build_step_args(step: &railrna_compiler::Step) -> Vec<String> {
    let mut args = vec![
        "-D".to_string(),
        format!("mapreduce.job.reduces={}", step.task_count),
    ];

    for (key, value) in &step.extra_config {
        args.extend(["-D".to_string(), format!("{key}={value}")]);
    }

    if let Some(partition) = step.partition {
        args.extend([
            "-D".to_string(),
            format!(
                "stream.num.map.output.key.fields={}",
                partition.key_len
            ),
            "-D".to_string(),
            format!(
                "mapreduce.partition.keypartitioner.options=-k1,{}",
                partition.prefix_len
            ),
        ]);
        if partition.key_len != partition.prefix_len {
            args.extend([
                "-D".to_string(),
                "mapreduce.job.output.key.comparator.class=\
                 org.apache.hadoop.mapred.lib.KeyFieldBasedComparator"
                    .to_string(),
                "-D".to_string(),
                format!(
                    "mapreduce.partition.keycomparator.options=-k1,{} -k{},{}",
                    partition.prefix_len,
                    partition.prefix_len + 1,
                    partition.key_len
                ),
            ]);
        }
        args.extend([
            "-partitioner".to_string(),
            PARTITIONER_CLASS.to_string(),
        ]);
    }

    if let Some(archive) = &step.archive {
        args.extend(["-archives".to_string(), archive.to_display().to_string()]);
    }

    args.extend([
        "-input".to_string(),
        step.inputs
            .iter()
            .map(|u| u.to_display().to_string())
            .collect::<Vec<_>>()
            .join(","),
        "-output".to_string(),
        step.output.to_display().to_string(),
        "-mapper".to_string(),
        step.mapper_command.clone(),
        "-reducer".to_string(),
        step.reducer_command.clone(),
    ]);

    if step.multiple_outputs {
        args.extend([
            "-outputformat".to_string(),
            MULTIPLE_OUTPUT_FORMAT_CLASS.to_string(),
        ]);
    }

    if let Some(input_format) = &step.input_format {
        args.extend(["-inputformat".to_string(), input_format.clone()]);
    }

    args
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
