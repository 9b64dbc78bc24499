//! One-at-a-time agent update driver
//!
//! Walks a healthy cluster's instances in the order the API returned them
//! and stops at the first accepted update request, so each cluster has at
//! most one agent update started per run.

use crate::aws::EcsOperations;
use crate::notify::Notifier;
use ecstatic_common::{Cluster, ContainerInstance, UpdateOutcome};
use tracing::{debug, error, info};

/// What happened while driving updates for one cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRun {
    /// EC2 instance id that received the update request, if any
    pub requested: Option<String>,
    /// Update requests submitted (including the accepted one)
    pub attempts: usize,
    pub in_progress: usize,
    pub current: usize,
    pub errors: usize,
}

/// Chat text for a submitted update request.
pub fn update_requested_message(instance: &ContainerInstance, cluster: &Cluster) -> String {
    format!(
        "agent update requested, delaying additional updates until next run, \
         ec2_instance_id: {}, cluster_arn: {}",
        instance.ec2_instance_id, cluster.arn
    )
}

/// Submit agent updates until one is accepted.
///
/// Collisions with a running update, up-to-date agents and unexpected
/// errors all move on to the next instance; none of them abort the cluster.
pub async fn drive_updates<E, N>(
    ecs: &E,
    notifier: &N,
    cluster: &Cluster,
    instances: &[ContainerInstance],
) -> UpdateRun
where
    E: EcsOperations,
    N: Notifier,
{
    let mut run = UpdateRun::default();

    for instance in instances {
        info!(
            cluster_name = %cluster.name,
            ec2_instance_id = %instance.ec2_instance_id,
            "attempting container agent update"
        );
        run.attempts += 1;

        let outcome = ecs
            .update_container_agent(&cluster.arn, &instance.container_instance_arn)
            .await;

        match outcome {
            UpdateOutcome::Requested => {
                info!(
                    ec2_instance_id = %instance.ec2_instance_id,
                    cluster_name = %cluster.name,
                    "agent update requested, delaying additional updates until next run"
                );
                debug!(instance = ?instance, "agent update requested");
                notifier
                    .notify(&update_requested_message(instance, cluster))
                    .await;
                run.requested = Some(instance.ec2_instance_id.clone());
                return run;
            }
            UpdateOutcome::AlreadyInProgress => {
                info!(ec2_instance_id = %instance.ec2_instance_id, "agent update in progress");
                run.in_progress += 1;
            }
            UpdateOutcome::NoUpdateAvailable => {
                info!(
                    ec2_instance_id = %instance.ec2_instance_id,
                    agent_version = %instance.version_info.agent_version(),
                    docker_version = %instance.version_info.docker_version(),
                    "agent is current"
                );
                run.current += 1;
            }
            UpdateOutcome::UnexpectedError(detail) => {
                error!(
                    ec2_instance_id = %instance.ec2_instance_id,
                    cluster_arn = %cluster.arn,
                    error = %detail,
                    "unexpected error requesting agent update"
                );
                run.errors += 1;
            }
        }
    }

    info!(
        cluster_arn = %cluster.arn,
        attempts = run.attempts,
        in_progress = run.in_progress,
        current = run.current,
        errors = run.errors,
        "no agent update requested for cluster this run"
    );
    run
}
