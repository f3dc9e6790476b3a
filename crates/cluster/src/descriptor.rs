// SPDX-License-Identifier: MIT

//! The job-flow descriptor JSON shape, serialized exactly as spec §6
//! describes it for a hosted MapReduce service.

use std::collections::BTreeMap;

use railrna_compiler::{InstanceGroup, InstanceRole, Market};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct JobFlowDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "LogUri")]
    pub log_uri: String,
    #[serde(rename = "AmiVersion")]
    pub ami_version: String,
    #[serde(rename = "Tags")]
    pub tags: BTreeMap<String, String>,
    #[serde(rename = "VisibleToAllUsers")]
    pub visible_to_all_users: String,
    #[serde(rename = "Instances")]
    pub instances: InstancesDescriptor,
    #[serde(rename = "BootstrapActions")]
    pub bootstrap_actions: Vec<BootstrapActionDescriptor>,
    #[serde(rename = "Steps")]
    pub steps: Vec<StepDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstancesDescriptor {
    #[serde(rename = "InstanceGroups")]
    pub instance_groups: Vec<InstanceGroupDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceGroupDescriptor {
    #[serde(rename = "InstanceCount")]
    pub instance_count: u32,
    #[serde(rename = "InstanceRole")]
    pub instance_role: InstanceRoleDescriptor,
    #[serde(rename = "InstanceType")]
    pub instance_type: String,
    #[serde(rename = "Market")]
    pub market: MarketDescriptor,
    #[serde(rename = "BidPrice", skip_serializing_if = "Option::is_none")]
    pub bid_price: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstanceRoleDescriptor {
    #[serde(rename = "MASTER")]
    Master,
    #[serde(rename = "CORE")]
    Core,
    #[serde(rename = "TASK")]
    Task,
}

impl From<InstanceRole> for InstanceRoleDescriptor {
    fn from(role: InstanceRole) -> Self {
        match role {
            InstanceRole::Master => InstanceRoleDescriptor::Master,
            InstanceRole::Core => InstanceRoleDescriptor::Core,
            InstanceRole::Task => InstanceRoleDescriptor::Task,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketDescriptor {
    #[serde(rename = "ON_DEMAND")]
    OnDemand,
    #[serde(rename = "SPOT")]
    Spot,
}

impl From<Market> for MarketDescriptor {
    fn from(market: Market) -> Self {
        match market {
            Market::OnDemand => MarketDescriptor::OnDemand,
            Market::Spot => MarketDescriptor::Spot,
        }
    }
}

impl From<&InstanceGroup> for InstanceGroupDescriptor {
    fn from(group: &InstanceGroup) -> Self {
        Self {
            instance_count: group.count,
            instance_role: group.role.into(),
            instance_type: group.instance_type.clone(),
            market: group.market.into(),
            bid_price: group.bid_price.map(|p| format!("{p:.2}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapActionDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionOnFailure {
    #[serde(rename = "TERMINATE_JOB_FLOW")]
    TerminateAll,
    #[serde(rename = "CANCEL_AND_WAIT")]
    CancelAndWait,
    #[serde(rename = "CONTINUE")]
    Continue,
    #[serde(rename = "TERMINATE_CLUSTER")]
    TerminateCluster,
}

#[derive(Debug, Clone, Serialize)]
pub struct HadoopJarStep {
    #[serde(rename = "Jar")]
    pub jar: String,
    #[serde(rename = "Args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ActionOnFailure")]
    pub action_on_failure: ActionOnFailure,
    #[serde(rename = "HadoopJarStep")]
    pub hadoop_jar_step: HadoopJarStep,
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
