// SPDX-License-Identifier: MIT

use super::*;
use anyhow::anyhow;

#[test]
fn redundant_chain_is_collapsed_to_the_top_message() {
    let err = anyhow!("outer: inner detail").context("outer");
    let rendered = format_error(&err);
    assert!(!rendered.contains("Caused by"));
}

#[test]
fn distinct_chain_is_rendered_in_full() {
    let err = anyhow!("root cause").context("higher-level context");
    let rendered = format_error(&err);
    assert!(rendered.contains("higher-level context"));
    assert!(rendered.contains("Caused by"));
    assert!(rendered.contains("root cause"));
}
