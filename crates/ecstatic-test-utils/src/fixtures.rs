//! Fixture builders for the fleet model
//!
//! ```
//! use ecstatic_common::AgentUpdateStatus;
//! use ecstatic_test_utils::fixtures::instance;
//!
//! let ci = instance("i-0abc").update_status(AgentUpdateStatus::Failed).build();
//! assert!(ci.agent_connected);
//! assert!(ci.agent_update_status.is_failed());
//! ```

use ecstatic_common::{AgentUpdateStatus, Cluster, ContainerInstance, VersionInfo};

/// Build a cluster whose name is the last path segment of the ARN.
pub fn cluster(arn: &str) -> Cluster {
    let name = arn.rsplit('/').next().unwrap_or(arn);
    Cluster::new(arn, name)
}

/// Start building a connected, never-updated container instance.
pub fn instance(ec2_instance_id: &str) -> InstanceBuilder {
    InstanceBuilder::new(ec2_instance_id)
}

/// Builder for [`ContainerInstance`] test values
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    instance: ContainerInstance,
}

impl InstanceBuilder {
    pub fn new(ec2_instance_id: &str) -> Self {
        Self {
            instance: ContainerInstance {
                ec2_instance_id: ec2_instance_id.to_string(),
                container_instance_arn: container_instance_arn(ec2_instance_id),
                agent_connected: true,
                agent_update_status: AgentUpdateStatus::None,
                version_info: VersionInfo {
                    agent_version: Some("1.82.0".to_string()),
                    docker_version: Some("DockerVersion: 20.10.25".to_string()),
                },
            },
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.instance.agent_connected = false;
        self
    }

    pub fn update_status(mut self, status: AgentUpdateStatus) -> Self {
        self.instance.agent_update_status = status;
        self
    }

    pub fn arn(mut self, container_instance_arn: &str) -> Self {
        self.instance.container_instance_arn = container_instance_arn.to_string();
        self
    }

    pub fn agent_version(mut self, version: &str) -> Self {
        self.instance.version_info.agent_version = Some(version.to_string());
        self
    }

    pub fn build(self) -> ContainerInstance {
        self.instance
    }
}

/// Container instance ARN derived from an EC2 id, stable across calls.
pub fn container_instance_arn(ec2_instance_id: &str) -> String {
    format!("arn:aws:ecs:us-east-1:123456789012:container-instance/{ec2_instance_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_name_from_arn() {
        let c = cluster("arn:aws:ecs:us-east-1:123456789012:cluster/prod");
        assert_eq!(c.name, "prod");

        let c = cluster("arn:c1");
        assert_eq!(c.name, "arn:c1");
    }

    #[test]
    fn test_builder_defaults_are_healthy() {
        let ci = instance("i1").build();
        assert!(ci.agent_connected);
        assert_eq!(ci.agent_update_status, AgentUpdateStatus::None);
        assert_eq!(ci.container_instance_arn, container_instance_arn("i1"));
    }

    #[test]
    fn test_builder_overrides() {
        let ci = instance("i2")
            .disconnected()
            .arn("arn:ci/custom")
            .agent_version("1.50.0")
            .build();
        assert!(!ci.agent_connected);
        assert_eq!(ci.container_instance_arn, "arn:ci/custom");
        assert_eq!(ci.version_info.agent_version(), "1.50.0");
    }
}
