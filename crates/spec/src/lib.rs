// SPDX-License-Identifier: MIT

//! railrna-spec: the manifest/protostep data model and the config
//! validator that checks a [`RunConfig`](validator::RunConfig) against it.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod manifest;
pub mod protostep;
pub mod sample_label;
pub mod validator;

pub use manifest::{Manifest, ManifestError, ManifestLine, parse_manifest};
pub use protostep::{
    OpKind, ProtoStep, ProtoStepError, ProtoStepFlags, StepInput, StepOutput, StreamingOperator,
};
pub use sample_label::SampleLabel;
pub use validator::{
    Backend, ConfigError, Dependency, EnvironmentError, IndexSpec, RunConfig, ValidationReport,
    Validator,
};
