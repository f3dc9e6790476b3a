// SPDX-License-Identifier: MIT

//! railrna-core: shared primitives for the Rail-RNA pipeline driver.
//!
//! This crate holds the pieces every other crate in the workspace depends
//! on: the [`Url`] abstraction, ID newtypes, the [`Clock`] trait used to keep
//! time-dependent logic (retry backoff, watchdog polling) testable, and the
//! error kinds the URL abstraction can fail with.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod error;
pub mod id;
pub mod url;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::UrlError;
pub use id::{EngineId, IdGen, PipelineRunId, SequentialIdGen, ShortId, StepId, TaskId, UuidIdGen};
pub use url::{ExternalToolConfig, ExternalUrlBackend, Url, UrlBackend, UrlVariant};

#[cfg(feature = "test-support")]
pub mod test_support;
