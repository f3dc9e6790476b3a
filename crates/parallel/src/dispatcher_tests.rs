// SPDX-License-Identifier: MIT

use super::*;
use railrna_core::{test_support::InMemoryUrlBackend, SequentialIdGen};
use railrna_spec::Backend;

use crate::engine::LocalEngine;

fn base_config(output: &str) -> RunConfig {
    RunConfig {
        backend: Backend::Local,
        manifest_text: None,
        manifest_source: "missing.tsv".to_string(),
        output: railrna_core::Url::parse(output.to_string()),
        force: true,
        preprocess_mode: false,
        num_processes: 4,
        max_task_attempts: 3,
        gzip_intermediates: false,
        gzip_level: 1,
        sort_memory_cap: None,
        dependencies: vec![],
        indexes: vec![],
        path_dirs: vec![],
        uses_object_store: false,
        has_credentials: true,
        has_http_client: true,
    }
}

#[tokio::test]
async fn probe_and_elect_copiers_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let dispatcher = ParallelDispatcher::new(vec![
        Arc::new(LocalEngine::new(EngineId::new("e1"), "host1")),
        Arc::new(LocalEngine::new(EngineId::new("e2"), "host1")),
    ]);
    let id_gen = SequentialIdGen::new("probe");
    dispatcher.probe(tmp.path(), &id_gen).await.unwrap();

    let copiers = dispatcher.elect_copiers();
    assert_eq!(copiers.len(), 1);
    assert_eq!(copiers["host1"], EngineId::new("e1"));
}

#[tokio::test]
async fn revalidate_per_engine_groups_identical_messages() {
    let e1 = EngineId::new("e1");
    let e2 = EngineId::new("e2");
    let dispatcher = ParallelDispatcher::new(vec![
        Arc::new(LocalEngine::new(e1.clone(), "host1")),
        Arc::new(LocalEngine::new(e2.clone(), "host2")),
    ]);

    let mut configs = HashMap::new();
    configs.insert(e1.clone(), base_config("s3://bucket/out"));
    configs.insert(e2.clone(), base_config("s3://bucket/out"));

    let results = dispatcher
        .revalidate_per_engine(&configs, &[], |_engine| {
            Arc::new(InMemoryUrlBackend::new()) as Arc<dyn railrna_core::UrlBackend>
        })
        .await;

    let grouped = group_by_message(&results);
    // Both engines share the same (deliberately unreachable) manifest
    // source, so both configs fail the same way and should group together.
    assert!(grouped.iter().any(|g| g.engines.len() == 2));
}
