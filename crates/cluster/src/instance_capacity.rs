// SPDX-License-Identifier: MIT

//! Known-capacity table for hosted-cluster instance types: vcore count,
//! total memory, and the YARN nodemanager memory ceiling derived from it.
//! Values are AWS's published EMR task-configuration figures for the
//! instance families this driver has historically targeted.

/// Per-worker resource profile computed for a given instance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceCapacity {
    pub vcores: u32,
    pub memory_mb: u32,
    pub nodemanager_memory_mb: u32,
}

const TABLE: &[(&str, u32, u32, u32)] = &[
    ("m1.small", 1, 2 * 1024, 1024),
    ("m1.large", 2, 8 * 1024, 3072),
    ("m1.xlarge", 4, 16 * 1024, 12288),
    ("c1.medium", 2, 2 * 1024, 1024),
    ("c1.xlarge", 8, 8 * 1024, 5120),
    ("m2.xlarge", 2, 16 * 1024, 14336),
    ("m2.2xlarge", 4, 16 * 1024, 30720),
    ("m2.4xlarge", 8, 16 * 1024, 61440),
    ("cc1.4xlarge", 8, 16 * 1024, 20480),
    ("m3.xlarge", 4, 15 * 1024, 11520),
    ("m3.2xlarge", 8, 30 * 1024, 23040),
    ("c3.2xlarge", 8, 15 * 1024, 11520),
    ("c3.4xlarge", 16, 30 * 1024, 23040),
    ("c3.8xlarge", 32, 60 * 1024, 53248),
];

/// Looks up an instance type's known capacity. Returns `None` for an
/// unrecognized type; callers validating user input should reject before
/// reaching the dispatcher, so this is an infallible lookup here.
pub fn capacity_for(instance_type: &str) -> Option<InstanceCapacity> {
    TABLE
        .iter()
        .find(|(name, ..)| *name == instance_type)
        .map(|(_, vcores, memory_mb, nodemanager_memory_mb)| InstanceCapacity {
            vcores: *vcores,
            memory_mb: *memory_mb,
            nodemanager_memory_mb: *nodemanager_memory_mb,
        })
}

pub fn known_instance_types() -> Vec<&'static str> {
    TABLE.iter().map(|(name, ..)| *name).collect()
}

#[cfg(test)]
#[path = "instance_capacity_tests.rs"]
mod tests;
