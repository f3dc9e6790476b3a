// SPDX-License-Identifier: MIT

//! railrna-cluster: job-flow descriptor assembly for the hosted-cluster
//! backend — instance groups by role, per-instance-type capacity, and
//! Hadoop Streaming step arguments.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod instance_capacity;

pub use descriptor::{
    ActionOnFailure, BootstrapActionDescriptor, HadoopJarStep, InstanceGroupDescriptor,
    InstanceRoleDescriptor, InstancesDescriptor, JobFlowDescriptor, MarketDescriptor,
    StepDescriptor,
};
pub use dispatcher::{build_job_flow, ClusterSettings};
pub use error::ClusterError;
pub use instance_capacity::{capacity_for, known_instance_types, InstanceCapacity};
