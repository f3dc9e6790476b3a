// SPDX-License-Identifier: MIT

//! railrna-parallel: the parallel backend's worker-engine pool — probing
//! shared-directory visibility, electing per-host copiers, distributing
//! code/manifest/index assets, and fanning the validator out per engine.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod copier;
pub mod dispatcher;
pub mod distribute;
pub mod engine;
pub mod error;
pub mod probe;
pub mod watchdog;

pub use copier::elect_copiers;
pub use dispatcher::{group_by_message, EngineValidation, GroupedError, ParallelDispatcher};
pub use distribute::{distribute_assets, SharedAssets};
pub use engine::{Engine, EngineKind, LocalEngine, RemoteEngine};
pub use error::{EngineError, ProbeError};
pub use probe::run_probe;
