//! SDK response to fleet model conversion
//!
//! Everything representation-specific about the ECS API stops here: the raw
//! update-status string is parsed into [`AgentUpdateStatus`] and the agent
//! connectivity flag arrives as a plain `bool`, so health evaluation never
//! sees API encodings.

use anyhow::{Context, Result};
use aws_sdk_ecs::types;
use ecstatic_common::defaults::UNKNOWN_INSTANCE_ID;
use ecstatic_common::{AgentUpdateStatus, Cluster, ContainerInstance, VersionInfo};

/// Convert a described cluster. Clusters without an ARN are dropped.
pub(super) fn cluster(sdk: &types::Cluster) -> Option<Cluster> {
    let arn = sdk.cluster_arn()?;
    let name = sdk.cluster_name().unwrap_or(arn);
    Some(Cluster::new(arn, name))
}

/// Convert a described container instance.
///
/// An instance without an ARN cannot be addressed by an update request, so
/// it fails the conversion (and with it the cluster scan).
pub(super) fn container_instance(sdk: &types::ContainerInstance) -> Result<ContainerInstance> {
    let container_instance_arn = sdk
        .container_instance_arn()
        .context("Container instance returned without an ARN")?
        .to_string();

    let version_info = sdk
        .version_info()
        .map(|v| VersionInfo {
            agent_version: v.agent_version().map(str::to_string),
            docker_version: v.docker_version().map(str::to_string),
        })
        .unwrap_or_default();

    Ok(ContainerInstance {
        ec2_instance_id: sdk
            .ec2_instance_id()
            .unwrap_or(UNKNOWN_INSTANCE_ID)
            .to_string(),
        container_instance_arn,
        agent_connected: sdk.agent_connected(),
        agent_update_status: AgentUpdateStatus::from_api(
            sdk.agent_update_status().map(|s| s.as_str()),
        ),
        version_info,
    })
}

/// Render a describe failure as `arn: reason (detail)`.
pub(super) fn failure(f: &types::Failure) -> String {
    let arn = f.arn().unwrap_or("unknown");
    let reason = f.reason().unwrap_or("unknown reason");
    match f.detail() {
        Some(detail) => format!("{arn}: {reason} ({detail})"),
        None => format!("{arn}: {reason}"),
    }
}

/// Fail if `DescribeContainerInstances` reported any per-instance failure.
///
/// A cluster whose instances cannot all be inspected must not be updated.
pub(super) fn ensure_described(cluster_arn: &str, failures: &[types::Failure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    let rendered: Vec<String> = failures.iter().map(failure).collect();
    anyhow::bail!(
        "Failed to describe {} container instance(s) in cluster {}: {}",
        rendered.len(),
        cluster_arn,
        rendered.join("; ")
    )
}
