// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn starts_uncancelled() {
    let token = CancelToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn cancel_is_observed() {
    let token = CancelToken::new();
    token.cancel();
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn cancelled_future_resolves_after_cancel() {
    let token = CancelToken::new();
    let waiter = token.clone();
    let handle = tokio::spawn(async move {
        waiter.cancelled().await;
    });
    token.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("did not resolve in time")
        .unwrap();
}

#[tokio::test]
async fn cancelled_returns_immediately_if_already_cancelled() {
    let token = CancelToken::new();
    token.cancel();
    tokio::time::timeout(std::time::Duration::from_millis(100), token.cancelled())
        .await
        .expect("should resolve immediately");
}
