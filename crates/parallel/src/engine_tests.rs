// SPDX-License-Identifier: MIT

use super::*;
use railrna_core::EngineId;

#[tokio::test]
async fn local_engine_write_then_exists_roundtrips() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = LocalEngine::new(EngineId::new("e1"), "localhost");
    let path = tmp.path().join("probe");
    engine.write_file(&path, b"hello").await.unwrap();
    assert!(engine.file_exists(&path).await.unwrap());
}

#[tokio::test]
async fn local_engine_missing_file_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = LocalEngine::new(EngineId::new("e1"), "localhost");
    assert!(!engine
        .file_exists(&tmp.path().join("nope"))
        .await
        .unwrap());
}

#[tokio::test]
async fn local_engine_copy_in_creates_parent_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src.txt");
    std::fs::write(&src, b"data").unwrap();
    let engine = LocalEngine::new(EngineId::new("e1"), "localhost");
    let dest = tmp.path().join("nested/dir/dest.txt");
    engine.copy_in(&src, &dest).await.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"data");
}

#[test]
fn engine_kind_distinguishes_local_from_remote() {
    let local = LocalEngine::new(EngineId::new("e1"), "localhost");
    let remote = RemoteEngine::new(EngineId::new("e2"), "worker1", None);
    assert_eq!(local.kind(), EngineKind::Local);
    assert_eq!(remote.kind(), EngineKind::Remote);
    assert_eq!(remote.host(), "worker1");
}
