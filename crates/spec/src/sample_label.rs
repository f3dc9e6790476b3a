// SPDX-License-Identifier: MIT

//! The `<Group>-<BioRep>-<TechRep>` sample label shape.

use std::fmt;

use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^-]+-[^-]+-[^-]+$").expect("static regex is valid"))
}

/// A validated `<Group>-<BioRep>-<TechRep>` sample label.
///
/// Construction is the only way to obtain one, so once a `SampleLabel`
/// exists its shape is guaranteed — illegal shapes never reach code that
/// consumes this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct SampleLabel(String);

impl SampleLabel {
    /// Parses `raw` against `^[^-]+-[^-]+-[^-]+$`, returning the offending
    /// string back on rejection so callers can build a precise message.
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if label_pattern().is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(raw)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits into the three encoded components: (Group, BioRep, TechRep).
    pub fn components(&self) -> (&str, &str, &str) {
        let mut parts = self.0.splitn(3, '-');
        let group = parts.next().unwrap_or_default();
        let bio_rep = parts.next().unwrap_or_default();
        let tech_rep = parts.next().unwrap_or_default();
        (group, bio_rep, tech_rep)
    }
}

impl fmt::Display for SampleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "sample_label_tests.rs"]
mod tests;
