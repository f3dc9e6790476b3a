// SPDX-License-Identifier: MIT

use super::*;
use railrna_compiler::{FailurePolicy, PartitionConfig, Pipeline, Step};
use railrna_core::test_support::InMemoryUrlBackend;

fn test_config(scratch: &Path) -> ExecutorConfig {
    ExecutorConfig {
        num_processes: 2,
        max_task_attempts: 1,
        gzip_intermediates: false,
        gzip_level: 6,
        sort_memory_cap: None,
        scratch_dir: scratch.to_path_buf(),
        sort_command: "sort".to_string(),
        keep_intermediates: false,
    }
}

#[tokio::test]
async fn map_only_step_writes_mapper_output_under_step_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("in");
    std::fs::create_dir_all(&input_dir).unwrap();
    let input_file = input_dir.join("reads.txt");
    std::fs::write(&input_file, "hello world\n").unwrap();

    let output_url = Url::parse(tmp.path().join("out").to_string_lossy().into_owned());
    let step = Step {
        name: "upper".to_string(),
        mapper_command: "tr a-z A-Z".to_string(),
        reducer_command: String::new(),
        task_count: 1,
        partition: None,
        inputs: vec![Url::parse(input_file.to_string_lossy().into_owned())],
        output: output_url.clone(),
        failure_policy: FailurePolicy::TerminateAll,
        archive: None,
        index_output: false,
        input_format: None,
        multiple_outputs: false,
        extra_config: Vec::new(),
    };
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };

    let scratch = tmp.path().join("scratch");
    let executor = LocalExecutor::new(test_config(&scratch));
    let backend = InMemoryUrlBackend::new();
    let cancel = CancelToken::new();

    executor
        .run_pipeline(&pipeline, &backend, &cancel)
        .await
        .unwrap();

    let produced = std::fs::read_dir(output_url.as_path().unwrap())
        .unwrap()
        .map(|e| std::fs::read_to_string(e.unwrap().path()).unwrap())
        .collect::<Vec<_>>()
        .join("");
    assert!(produced.contains("HELLO WORLD"));
}

#[tokio::test]
async fn reduce_step_groups_equal_prefix_records_per_task() {
    let tmp = tempfile::tempdir().unwrap();
    let input_file = tmp.path().join("records.tsv");
    std::fs::write(
        &input_file,
        "a\t1\t9\na\t1\t3\na\t2\t5\nb\t1\t7\n",
    )
    .unwrap();

    let output_url = Url::parse(tmp.path().join("out").to_string_lossy().into_owned());
    let step = Step {
        name: "collapse".to_string(),
        mapper_command: "cat".to_string(),
        reducer_command: "cat".to_string(),
        task_count: 2,
        partition: Some(PartitionConfig {
            prefix_len: 2,
            key_len: 3,
        }),
        inputs: vec![Url::parse(input_file.to_string_lossy().into_owned())],
        output: output_url.clone(),
        failure_policy: FailurePolicy::TerminateAll,
        archive: None,
        index_output: false,
        input_format: None,
        multiple_outputs: false,
        extra_config: Vec::new(),
    };
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };

    let scratch = tmp.path().join("scratch");
    let executor = LocalExecutor::new(test_config(&scratch));
    let backend = InMemoryUrlBackend::new();
    let cancel = CancelToken::new();

    executor
        .run_pipeline(&pipeline, &backend, &cancel)
        .await
        .unwrap();

    let out_dir = output_url.as_path().unwrap();
    let mut all_lines = Vec::new();
    for entry in std::fs::read_dir(out_dir).unwrap() {
        let path = entry.unwrap().path();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<String> = content.lines().map(|s| s.to_string()).collect();
        // a,1 records must co-locate and stay in ascending full-key order.
        let a1: Vec<&String> = lines.iter().filter(|l| l.starts_with("a\t1")).collect();
        if !a1.is_empty() {
            assert_eq!(a1, vec!["a\t1\t3", "a\t1\t9"]);
        }
        all_lines.extend(lines);
    }
    assert_eq!(all_lines.len(), 4);
}

#[tokio::test]
async fn already_complete_step_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let output_url = Url::parse(tmp.path().join("out").to_string_lossy().into_owned());
    std::fs::create_dir_all(output_url.as_path().unwrap()).unwrap();
    std::fs::write(output_url.as_path().unwrap().join("part-00000"), b"done").unwrap();

    let step = Step {
        name: "already-done".to_string(),
        mapper_command: "false".to_string(), // would fail if actually run
        reducer_command: String::new(),
        task_count: 1,
        partition: None,
        inputs: vec![],
        output: output_url,
        failure_policy: FailurePolicy::TerminateAll,
        archive: None,
        index_output: false,
        input_format: None,
        multiple_outputs: false,
        extra_config: Vec::new(),
    };
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };

    let scratch = tmp.path().join("scratch");
    let executor = LocalExecutor::new(test_config(&scratch));
    let backend = InMemoryUrlBackend::new();
    let cancel = CancelToken::new();

    executor
        .run_pipeline(&pipeline, &backend, &cancel)
        .await
        .unwrap();
}

#[tokio::test]
async fn task_exhausting_retries_fails_the_step() {
    let tmp = tempfile::tempdir().unwrap();
    let input_file = tmp.path().join("in.txt");
    std::fs::write(&input_file, "x\n").unwrap();
    let output_url = Url::parse(tmp.path().join("out").to_string_lossy().into_owned());

    let step = Step {
        name: "always-fails".to_string(),
        mapper_command: "exit 1".to_string(),
        reducer_command: String::new(),
        task_count: 1,
        partition: None,
        inputs: vec![Url::parse(input_file.to_string_lossy().into_owned())],
        output: output_url,
        failure_policy: FailurePolicy::TerminateAll,
        archive: None,
        index_output: false,
        input_format: None,
        multiple_outputs: false,
        extra_config: Vec::new(),
    };
    let pipeline = Pipeline {
        steps: vec![step],
        bootstrap_actions: vec![],
        instance_descriptors: vec![],
    };

    let mut config = test_config(&tmp.path().join("scratch"));
    config.max_task_attempts = 2;
    let executor = LocalExecutor::new(config);
    let backend = InMemoryUrlBackend::new();
    let cancel = CancelToken::new();

    let err = executor
        .run_pipeline(&pipeline, &backend, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::Task { attempts: 2, .. }));
}
