// SPDX-License-Identifier: MIT

use super::*;
use std::path::PathBuf;

#[test]
fn poll_script_deletes_the_exact_scratch_dir_when_orphaned() {
    let script = poll_script(&PathBuf::from("/tmp/railrna-scratch-7"));
    assert!(script.contains("rm -rf '/tmp/railrna-scratch-7'"));
    assert!(script.contains("ppid="));
    assert!(script.contains("= \"1\""));
}

#[test]
fn poll_script_quotes_paths_with_spaces() {
    let script = poll_script(&PathBuf::from("/tmp/has space"));
    assert!(script.contains("'/tmp/has space'"));
}
