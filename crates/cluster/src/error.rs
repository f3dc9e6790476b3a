// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("instance type \"{instance_type}\" has no known capacity entry")]
    UnknownInstanceType { instance_type: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
