// SPDX-License-Identifier: MIT

use super::*;

#[tokio::test]
async fn in_memory_backend_put_get_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("a.txt");
    std::fs::write(&src, b"payload").unwrap();

    let backend = InMemoryUrlBackend::new();
    let url = Url::parse("s3://bucket/a.txt");
    assert!(!backend.exists(&url).await.unwrap());

    backend.put(&src, &url).await.unwrap();
    assert!(backend.exists(&url).await.unwrap());

    let dest_dir = tmp.path().join("out");
    backend.get(&url, &dest_dir).await.unwrap();
    assert_eq!(std::fs::read(dest_dir.join("a.txt")).unwrap(), b"payload");
}

#[tokio::test]
async fn in_memory_backend_get_missing_is_not_found() {
    let backend = InMemoryUrlBackend::new();
    let url = Url::parse("s3://bucket/missing.txt");
    let err = backend.get(&url, std::path::Path::new("/tmp")).await.unwrap_err();
    assert!(matches!(err, UrlError::NotFound(_)));
}

#[tokio::test]
async fn in_memory_backend_is_dir_by_prefix() {
    let backend = InMemoryUrlBackend::new();
    backend.seed(&Url::parse("s3://bucket/dir/a.txt"), b"x".to_vec());
    assert!(backend.is_dir(&Url::parse("s3://bucket/dir")).await.unwrap());
    assert!(!backend.is_dir(&Url::parse("s3://bucket/dir/a.txt")).await.unwrap());
}

#[tokio::test]
async fn in_memory_backend_remove_dir_clears_prefix() {
    let backend = InMemoryUrlBackend::new();
    backend.seed(&Url::parse("s3://bucket/dir/a.txt"), b"x".to_vec());
    backend.seed(&Url::parse("s3://bucket/dir/b.txt"), b"y".to_vec());
    backend.seed(&Url::parse("s3://bucket/other.txt"), b"z".to_vec());

    backend.remove_dir(&Url::parse("s3://bucket/dir")).await.unwrap();

    assert!(!backend.exists(&Url::parse("s3://bucket/dir/a.txt")).await.unwrap());
    assert!(backend.exists(&Url::parse("s3://bucket/other.txt")).await.unwrap());
}
