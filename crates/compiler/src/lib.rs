// SPDX-License-Identifier: MIT

//! railrna-compiler: turns a declarative protostep list into a concrete,
//! backend-tagged [`Pipeline`].

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod compile;
pub mod error;
pub mod types;

pub use compile::PipelineCompiler;
pub use error::CompileError;
pub use types::{
    BootstrapAction, FailurePolicy, InstanceGroup, InstanceRole, Market, PartitionConfig,
    Pipeline, Step,
};
