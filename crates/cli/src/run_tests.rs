// SPDX-License-Identifier: MIT

use super::*;
use railrna_parallel::EngineKind;

fn cluster_args() -> ClusterArgs {
    ClusterArgs {
        common: CommonArgs {
            manifest: PathBuf::from("manifest.tsv"),
            output: "s3://bucket/out".to_string(),
            intermediate: "s3://bucket/intermediate".to_string(),
            pipeline: PathBuf::from("pipeline.toml"),
            num_processes: 1,
            keep_intermediates: false,
            gzip_intermediates: false,
            gzip_level: 6,
            sort_memory_cap: None,
            max_task_attempts: 4,
            force: false,
            profile: None,
            verbose: false,
            scratch: None,
        },
        core_instance_count: 3,
        master_instance_type: "c1.xlarge".to_string(),
        task_instance_bid_price: Some(0.25),
        action_on_failure: ActionOnFailureArg::CancelAndWait,
        intermediate_lifetime: 4,
    }
}

#[test]
fn build_instance_groups_appends_master_core_and_optional_task_by_role() {
    let groups = build_instance_groups(&cluster_args());
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].role, InstanceRole::Master);
    assert_eq!(groups[0].count, 1);
    assert_eq!(groups[1].role, InstanceRole::Core);
    assert_eq!(groups[1].count, 3);
    assert_eq!(groups[2].role, InstanceRole::Task);
    assert_eq!(groups[2].market, Market::Spot);
}

#[test]
fn build_instance_groups_omits_task_group_without_a_bid_price() {
    let mut args = cluster_args();
    args.task_instance_bid_price = None;
    let groups = build_instance_groups(&args);
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.role != InstanceRole::Task));
}

#[test]
fn failure_policy_override_replaces_terminate_all_only() {
    assert_eq!(
        failure_policy_override(FailurePolicy::TerminateAll, ActionOnFailureArg::Continue),
        FailurePolicy::Continue
    );
    assert_eq!(
        failure_policy_override(FailurePolicy::Continue, ActionOnFailureArg::TerminateAll),
        FailurePolicy::Continue
    );
}

#[test]
fn build_engine_parses_user_at_host_as_remote() {
    let engine = build_engine(0, "alice@worker1");
    assert_eq!(engine.kind(), EngineKind::Remote);
    assert_eq!(engine.host(), "worker1");
}

#[test]
fn build_engine_recognizes_localhost_as_local() {
    let engine = build_engine(0, "localhost");
    assert_eq!(engine.kind(), EngineKind::Local);
}

#[test]
fn build_engine_treats_bare_hostname_as_remote_without_a_user() {
    let engine = build_engine(1, "worker2.internal");
    assert_eq!(engine.kind(), EngineKind::Remote);
    assert_eq!(engine.host(), "worker2.internal");
}
