// SPDX-License-Identifier: MIT

//! Error kinds shared across the workspace.

use thiserror::Error;

/// Failure modes for [`crate::url::UrlBackend`] operations.
///
/// Every backend (filesystem, DFS client, object-store client, HTTP client)
/// maps its own failures down to one of these four kinds so callers can
/// branch on cause without matching on backend-specific error types.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("transport error talking to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("operation not supported by this backend: {0}")]
    NotSupported(String),
}

/// Failures parsing the ambient inputs every crate reads: manifests, sample
/// labels, and URLs.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed url {0:?}: {1}")]
    InvalidUrl(String, String),

    #[error("malformed sample label {0:?}: expected <sample>-<group>-<lane> (three '-'-separated fields, no field empty)")]
    InvalidSampleLabel(String),

    #[error("malformed manifest line {line_no} in {source}: {reason}")]
    InvalidManifestLine {
        source: String,
        line_no: usize,
        reason: String,
    },

    #[error(transparent)]
    Url(#[from] UrlError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
