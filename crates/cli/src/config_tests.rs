// SPDX-License-Identifier: MIT

use super::*;
use crate::cli::CommonArgs;
use indexmap::IndexMap;
use railrna_spec::{Backend, ProtoStep, StepInput, StepOutput, StreamingOperator};
use std::path::PathBuf;

fn operator_step(name: &str) -> ProtoStep {
    ProtoStep {
        name: name.to_string(),
        program: StreamingOperator {
            name: name.to_string(),
            command_template: format!("{name} --tasks {{task_count}}"),
        },
        inputs: vec![StepInput::External(Url::parse("s3://bucket/raw"))],
        output: StepOutput::Logical("out".to_string()),
        keys_per_record: None,
        partition_prefix_len: None,
        task_multiplier: None,
        min_tasks: None,
        max_tasks: None,
        archive: Some(Url::parse("s3://bucket/genome.tar.gz")),
        input_format: None,
        flags: Default::default(),
        extra_config: IndexMap::new(),
    }
}

fn args(manifest: PathBuf, output: &str) -> CommonArgs {
    CommonArgs {
        manifest,
        output: output.to_string(),
        intermediate: "/tmp/intermediate".to_string(),
        pipeline: PathBuf::from("pipeline.toml"),
        num_processes: 4,
        keep_intermediates: false,
        gzip_intermediates: false,
        gzip_level: 6,
        sort_memory_cap: None,
        max_task_attempts: 3,
        force: false,
        profile: None,
        verbose: false,
        scratch: None,
    }
}

#[test]
fn missing_manifest_yields_none_text_not_an_error() {
    let cfg = build_run_config(
        &args(PathBuf::from("/no/such/manifest.tsv"), "/tmp/out"),
        Backend::Local,
        &[],
    )
    .unwrap();
    assert!(cfg.manifest_text.is_none());
    assert_eq!(cfg.manifest_source, "/no/such/manifest.tsv");
}

#[test]
fn present_manifest_is_read_into_manifest_text() {
    let tmp = tempfile::tempdir().unwrap();
    let manifest = tmp.path().join("manifest.tsv");
    std::fs::write(&manifest, "reads.fq.gz\t0\tGroupA-Rep1-Tech1\n").unwrap();

    let cfg = build_run_config(&args(manifest, "/tmp/out"), Backend::Local, &[]).unwrap();
    assert!(cfg.manifest_text.unwrap().contains("GroupA-Rep1-Tech1"));
}

#[test]
fn object_store_output_sets_uses_object_store() {
    let tmp = tempfile::tempdir().unwrap();
    let manifest = tmp.path().join("manifest.tsv");
    std::fs::write(&manifest, "reads.fq.gz\t0\tGroupA-Rep1-Tech1\n").unwrap();

    let cfg = build_run_config(&args(manifest, "s3://bucket/out"), Backend::Cluster, &[]).unwrap();
    assert!(cfg.uses_object_store);
}

#[test]
fn dependencies_always_include_sort() {
    let tmp = tempfile::tempdir().unwrap();
    let manifest = tmp.path().join("manifest.tsv");
    std::fs::write(&manifest, "reads.fq.gz\t0\tGroupA-Rep1-Tech1\n").unwrap();

    let cfg = build_run_config(&args(manifest, "/tmp/out"), Backend::Local, &[]).unwrap();

    let names: Vec<&str> = cfg.dependencies.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["sort"]);
}

#[test]
fn archive_side_inputs_become_index_specs() {
    let tmp = tempfile::tempdir().unwrap();
    let manifest = tmp.path().join("manifest.tsv");
    std::fs::write(&manifest, "reads.fq.gz\t0\tGroupA-Rep1-Tech1\n").unwrap();

    let protosteps = vec![operator_step("align")];
    let cfg = build_run_config(&args(manifest, "/tmp/out"), Backend::Local, &protosteps).unwrap();

    assert_eq!(cfg.indexes.len(), 1);
    assert_eq!(cfg.indexes[0].basename, Url::parse("s3://bucket/genome"));
    assert_eq!(cfg.indexes[0].required_extensions, vec!["tar.gz".to_string()]);
}
