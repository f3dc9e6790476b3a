// SPDX-License-Identifier: MIT

use super::*;

fn operator(name: &str) -> StreamingOperator {
    StreamingOperator {
        name: name.to_string(),
        command_template: format!("{name} --tasks {{task_count}}"),
    }
}

fn base_step(name: &str) -> ProtoStep {
    ProtoStep {
        name: name.to_string(),
        program: operator("op"),
        inputs: vec![StepInput::Logical("prior".to_string())],
        output: StepOutput::Logical("out".to_string()),
        keys_per_record: None,
        partition_prefix_len: None,
        task_multiplier: None,
        min_tasks: None,
        max_tasks: None,
        archive: None,
        input_format: None,
        flags: ProtoStepFlags::default(),
        extra_config: IndexMap::new(),
    }
}

#[test]
fn map_only_when_keys_per_record_unset() {
    let step = base_step("s1");
    assert_eq!(step.op_kind(), OpKind::MapOnly);
    assert!(step.validate().is_empty());
}

#[test]
fn reduce_when_keys_per_record_set() {
    let mut step = base_step("s1");
    step.keys_per_record = Some(3);
    step.partition_prefix_len = Some(2);
    assert_eq!(step.op_kind(), OpKind::Reduce);
    assert!(step.validate().is_empty());
}

#[test]
fn rejects_partition_prefix_exceeding_keys() {
    let mut step = base_step("s1");
    step.keys_per_record = Some(2);
    step.partition_prefix_len = Some(3);
    let errors = step.validate();
    assert_eq!(
        errors,
        vec![ProtoStepError::PartitionPrefixExceedsKeys {
            name: "s1".to_string(),
            p: 3,
            k: 2
        }]
    );
}

#[test]
fn rejects_missing_partition_prefix_for_reducing_step() {
    let mut step = base_step("s1");
    step.keys_per_record = Some(2);
    let errors = step.validate();
    assert_eq!(
        errors,
        vec![ProtoStepError::PartitionPrefixZero {
            name: "s1".to_string()
        }]
    );
}

#[test]
fn rejects_zero_partition_prefix() {
    let mut step = base_step("s1");
    step.keys_per_record = Some(2);
    step.partition_prefix_len = Some(0);
    let errors = step.validate();
    assert_eq!(
        errors,
        vec![ProtoStepError::PartitionPrefixZero {
            name: "s1".to_string()
        }]
    );
}

#[test]
fn rejects_mutually_exclusive_output_flags() {
    let mut step = base_step("s1");
    step.flags.multiple_outputs = true;
    step.flags.direct_copy_to_final = true;
    let errors = step.validate();
    assert_eq!(
        errors,
        vec![ProtoStepError::MutuallyExclusiveOutputFlags {
            name: "s1".to_string()
        }]
    );
}

#[test]
fn accumulates_both_violations_at_once() {
    let mut step = base_step("s1");
    step.keys_per_record = Some(2);
    step.partition_prefix_len = Some(5);
    step.flags.multiple_outputs = true;
    step.flags.direct_copy_to_final = true;
    assert_eq!(step.validate().len(), 2);
}
