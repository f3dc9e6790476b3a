// SPDX-License-Identifier: MIT

//! Manifest parsing: the ordered list of sample lines read once per run and
//! shared (via `Arc`) across the validator, compiler, and every worker's
//! rewritten configuration in the parallel backend.

use std::sync::Arc;

use thiserror::Error;

use railrna_core::Url;

use crate::sample_label::SampleLabel;

/// One non-comment, non-blank line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    Single {
        url: Url,
        quality_tag: String,
        label: SampleLabel,
    },
    Paired {
        url1: Url,
        tag1: String,
        url2: Url,
        tag2: String,
        label: SampleLabel,
    },
}

impl ManifestLine {
    pub fn label(&self) -> &SampleLabel {
        match self {
            ManifestLine::Single { label, .. } => label,
            ManifestLine::Paired { label, .. } => label,
        }
    }

    /// URLs named by this line, in field order.
    pub fn urls(&self) -> Vec<&Url> {
        match self {
            ManifestLine::Single { url, .. } => vec![url],
            ManifestLine::Paired { url1, url2, .. } => vec![url1, url2],
        }
    }
}

/// Ordered collection of parsed manifest lines. Comment and blank lines are
/// dropped; only data lines survive.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    lines: Vec<ManifestLine>,
}

impl Manifest {
    pub fn lines(&self) -> &[ManifestLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// All URLs named anywhere in the manifest, in line order.
    pub fn all_urls(&self) -> Vec<&Url> {
        self.lines.iter().flat_map(|l| l.urls()).collect()
    }

    /// Wraps this manifest for sharing across the validator, compiler, and
    /// per-worker config rewrites without cloning the line list.
    pub fn into_shared(self) -> Arc<Manifest> {
        Arc::new(self)
    }
}

/// A malformed manifest line, carrying the 1-based line number so the
/// validator can name it exactly in its report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest line {line_no}: expected 3 or 5 tab-separated fields, found {field_count}")]
    WrongFieldCount { line_no: usize, field_count: usize },

    #[error("manifest line {line_no}: sample label {raw:?} does not match <Group>-<BioRep>-<TechRep>")]
    InvalidSampleLabel { line_no: usize, raw: String },
}

/// Parses manifest text, accumulating every malformed line instead of
/// stopping at the first one — the validator folds these into its own
/// accumulated error report.
pub fn parse_manifest(text: &str) -> (Manifest, Vec<ManifestError>) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = raw_line.split('\t').collect();
        match fields.len() {
            3 => {
                let label = match SampleLabel::parse(fields[2]) {
                    Ok(l) => l,
                    Err(raw) => {
                        errors.push(ManifestError::InvalidSampleLabel { line_no, raw });
                        continue;
                    }
                };
                lines.push(ManifestLine::Single {
                    url: Url::parse(fields[0]),
                    quality_tag: fields[1].to_string(),
                    label,
                });
            }
            5 => {
                let label = match SampleLabel::parse(fields[4]) {
                    Ok(l) => l,
                    Err(raw) => {
                        errors.push(ManifestError::InvalidSampleLabel { line_no, raw });
                        continue;
                    }
                };
                lines.push(ManifestLine::Paired {
                    url1: Url::parse(fields[0]),
                    tag1: fields[1].to_string(),
                    url2: Url::parse(fields[2]),
                    tag2: fields[3].to_string(),
                    label,
                });
            }
            n => {
                errors.push(ManifestError::WrongFieldCount {
                    line_no,
                    field_count: n,
                });
            }
        }
    }

    (Manifest { lines }, errors)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
