// SPDX-License-Identifier: MIT

use thiserror::Error;

use railrna_spec::ProtoStepError;

/// Failure compiling a protostep list into a [`crate::types::Pipeline`].
/// Accumulated across all protosteps: a single bad protostep does not stop
/// the compiler from reporting every other problem in the same pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Protostep(#[from] ProtoStepError),

    #[error("step {step:?} references unknown logical input {name:?} (not produced by any prior step)")]
    UnknownLogicalInput { step: String, name: String },

    #[error("step {step:?} names itself as its own output, which is not a prior step's output")]
    SelfReferentialOutput { step: String },
}
