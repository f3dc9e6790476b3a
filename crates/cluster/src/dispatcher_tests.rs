// SPDX-License-Identifier: MIT

use super::*;
use railrna_compiler::{
    BootstrapAction, FailurePolicy, InstanceGroup, InstanceRole, Market, PartitionConfig, Step,
};
use railrna_core::Url;

fn settings() -> ClusterSettings {
    ClusterSettings {
        name: "rail-rna-run".to_string(),
        log_uri: "s3://bucket/logs".to_string(),
        ami_version: "3.11.0".to_string(),
        tags: BTreeMap::new(),
        visible_to_all_users: true,
        hadoop_streaming_jar: None,
    }
}

fn reduce_step() -> railrna_compiler::Step {
    Step {
        name: "collapse".to_string(),
        mapper_command: "cat".to_string(),
        reducer_command: "collapse.py".to_string(),
        task_count: 8,
        partition: Some(PartitionConfig {
            prefix_len: 2,
            key_len: 3,
        }),
        inputs: vec![Url::parse("hdfs:///in".to_string())],
        output: Url::parse("hdfs:///out".to_string()),
        failure_policy: FailurePolicy::TerminateAll,
        archive: None,
        index_output: false,
        input_format: None,
        multiple_outputs: false,
        extra_config: Vec::new(),
    }
}

#[test]
fn unknown_instance_type_is_rejected_before_building_steps() {
    let pipeline = Pipeline {
        steps: vec![],
        bootstrap_actions: vec![],
        instance_descriptors: vec![InstanceGroup {
            role: InstanceRole::Master,
            instance_type: "z9.bogus".to_string(),
            count: 1,
            market: Market::OnDemand,
            bid_price: None,
        }],
    };
    let err = build_job_flow(&pipeline, &settings()).unwrap_err();
    assert!(matches!(err, ClusterError::UnknownInstanceType { .. }));
}

#[test]
fn reduce_step_args_include_partitioner_and_comparator() {
    let pipeline = Pipeline {
        steps: vec![reduce_step()],
        bootstrap_actions: vec![BootstrapAction {
            name: "install".to_string(),
            script_path: Url::parse("s3://bucket/bootstrap.sh".to_string()),
            args: vec![],
        }],
        instance_descriptors: vec![InstanceGroup {
            role: InstanceRole::Master,
            instance_type: "c1.xlarge".to_string(),
            count: 1,
            market: Market::OnDemand,
            bid_price: None,
        }],
    };
    let descriptor = build_job_flow(&pipeline, &settings()).unwrap();
    assert_eq!(descriptor.steps.len(), 1);
    let args = &descriptor.steps[0].hadoop_jar_step.args;
    assert!(args.contains(&"-partitioner".to_string()));
    assert!(args
        .iter()
        .any(|a| a.contains("mapreduce.job.output.key.comparator.class")));
    assert!(args.contains(&"-mapper".to_string()));
    assert!(args.contains(&"cat".to_string()));
    assert!(args.contains(&"collapse.py".to_string()));
    assert_eq!(descriptor.bootstrap_actions.len(), 1);
    assert_eq!(descriptor.bootstrap_actions[0].name, "install");
}

#[test]
fn map_only_step_omits_partitioner_args() {
    let mut step = reduce_step();
    step.partition = None;
    step.reducer_command = String::new();
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };
    let descriptor = build_job_flow(&pipeline, &settings()).unwrap();
    let args = &descriptor.steps[0].hadoop_jar_step.args;
    assert!(!args.contains(&"-partitioner".to_string()));
}

#[test]
fn multiple_outputs_step_emits_output_format() {
    let mut step = reduce_step();
    step.multiple_outputs = true;
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };
    let descriptor = build_job_flow(&pipeline, &settings()).unwrap();
    let args = &descriptor.steps[0].hadoop_jar_step.args;
    assert!(args.contains(&"-outputformat".to_string()));
    assert!(args.contains(&MULTIPLE_OUTPUT_FORMAT_CLASS.to_string()));
}

#[test]
fn input_format_override_is_passed_through() {
    let mut step = reduce_step();
    step.input_format = Some("com.example.CustomInputFormat".to_string());
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };
    let descriptor = build_job_flow(&pipeline, &settings()).unwrap();
    let args = &descriptor.steps[0].hadoop_jar_step.args;
    assert!(args.contains(&"-inputformat".to_string()));
    assert!(args.contains(&"com.example.CustomInputFormat".to_string()));
}

#[test]
fn extra_config_entries_become_d_args() {
    let mut step = reduce_step();
    step.extra_config = vec![("mapreduce.task.timeout".to_string(), "0".to_string())];
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };
    let descriptor = build_job_flow(&pipeline, &settings()).unwrap();
    let args = &descriptor.steps[0].hadoop_jar_step.args;
    assert!(args.contains(&"mapreduce.task.timeout=0".to_string()));
}
