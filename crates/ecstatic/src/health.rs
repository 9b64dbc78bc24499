//! Instance health evaluation and cluster verdicts
//!
//! Both functions here are pure: they classify already-normalized instance
//! state and return data. Logging and notification of the findings is the
//! scanner's job.

use ecstatic_common::ContainerInstance;
use std::fmt;

/// Health of one container instance in the current scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceHealthStatus {
    Healthy,
    AgentDisconnected,
    AgentUpdateFailed,
}

impl InstanceHealthStatus {
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for InstanceHealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Healthy => "healthy",
            Self::AgentDisconnected => "agent is not connected",
            Self::AgentUpdateFailed => "agent update failed",
        };
        f.write_str(s)
    }
}

/// Classify a single instance. A disconnected agent wins over a failed update.
pub fn evaluate(instance: &ContainerInstance) -> InstanceHealthStatus {
    if !instance.agent_connected {
        InstanceHealthStatus::AgentDisconnected
    } else if instance.agent_update_status.is_failed() {
        InstanceHealthStatus::AgentUpdateFailed
    } else {
        InstanceHealthStatus::Healthy
    }
}

/// An unhealthy instance and the alert to send for it
#[derive(Debug, Clone)]
pub struct Finding<'a> {
    pub instance: &'a ContainerInstance,
    pub status: InstanceHealthStatus,
    pub alert: String,
}

/// Verdict for one cluster in one scan
#[derive(Debug, Clone, Default)]
pub struct ClusterAssessment<'a> {
    /// One entry per unhealthy instance, in input order
    pub findings: Vec<Finding<'a>>,
}

impl ClusterAssessment<'_> {
    /// Healthy iff no instance produced a finding.
    pub fn is_healthy(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().map(|f| f.alert.as_str())
    }
}

/// Evaluate every instance of a cluster and collect an alert per problem.
///
/// An empty instance list is Healthy with no findings; callers are expected
/// to skip empty clusters before getting here.
pub fn assess<'a>(
    cluster_arn: &str,
    instances: &'a [ContainerInstance],
) -> ClusterAssessment<'a> {
    let findings = instances
        .iter()
        .filter_map(|instance| {
            let status = evaluate(instance);
            (!status.is_healthy()).then(|| Finding {
                instance,
                status,
                alert: alert_message(status, &instance.ec2_instance_id, cluster_arn),
            })
        })
        .collect();

    ClusterAssessment { findings }
}

/// Chat text for an unhealthy instance.
pub fn alert_message(
    status: InstanceHealthStatus,
    ec2_instance_id: &str,
    cluster_arn: &str,
) -> String {
    format!(":boom: *{status}*, ec2_instance_id: {ec2_instance_id}, cluster_arn: {cluster_arn}")
}
