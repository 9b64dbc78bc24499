//! Cluster and container instance model
//!
//! Values here are ephemeral: they are built from a describe call at the
//! start of a cluster scan and dropped when the scan ends.

use std::fmt;

/// An ECS cluster, identified by ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub arn: String,
    pub name: String,
}

impl Cluster {
    pub fn new(arn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            name: name.into(),
        }
    }
}

/// State of the most recent agent update on a container instance.
///
/// Parsed from the API's `agentUpdateStatus` string at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AgentUpdateStatus {
    /// No update has ever been requested
    #[default]
    None,
    /// An update is pending, staging, staged or updating (raw stage kept)
    InProgress(String),
    /// The last update completed
    Updated,
    /// The last update failed
    Failed,
    /// A status this build does not know about
    Other(String),
}

impl AgentUpdateStatus {
    /// Parse the API's textual status. Missing or empty means no update.
    pub fn from_api(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::None;
        };

        match raw.to_ascii_uppercase().as_str() {
            "PENDING" | "STAGING" | "STAGED" | "UPDATING" => Self::InProgress(raw.to_string()),
            "UPDATED" => Self::Updated,
            "FAILED" => Self::Failed,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for AgentUpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::InProgress(stage) => write!(f, "in-progress ({stage})"),
            Self::Updated => f.write_str("updated"),
            Self::Failed => f.write_str("failed"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Agent and container runtime versions reported by an instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionInfo {
    pub agent_version: Option<String>,
    pub docker_version: Option<String>,
}

impl VersionInfo {
    pub fn agent_version(&self) -> &str {
        self.agent_version.as_deref().unwrap_or("unknown")
    }

    pub fn docker_version(&self) -> &str {
        self.docker_version.as_deref().unwrap_or("unknown")
    }
}

/// A worker node registered to a cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInstance {
    /// EC2 instance id (or managed instance id for external instances)
    pub ec2_instance_id: String,
    /// Container instance ARN, used to address update requests
    pub container_instance_arn: String,
    /// Whether the ECS agent is connected to the control plane
    pub agent_connected: bool,
    pub agent_update_status: AgentUpdateStatus,
    pub version_info: VersionInfo,
}
