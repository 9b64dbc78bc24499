//! Recording fakes for the ECS and notification seams.

use crate::aws::EcsOperations;
use crate::notify::Notifier;
use anyhow::{Result, anyhow};
use ecstatic_common::{Cluster, ContainerInstance, UpdateOutcome};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Notifier that keeps every message it is given
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// One call made against [`FakeEcs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsCall {
    ListClusters,
    DescribeClusters(Vec<String>),
    ListContainerInstances(String),
    DescribeContainerInstances(String),
    UpdateContainerAgent {
        cluster_arn: String,
        container_instance_arn: String,
    },
}

/// In-memory ECS account.
///
/// Update outcomes are scripted per container instance ARN and default to
/// [`UpdateOutcome::NoUpdateAvailable`].
#[derive(Debug, Default)]
pub struct FakeEcs {
    clusters: Vec<Cluster>,
    instances: HashMap<String, Vec<ContainerInstance>>,
    outcomes: Mutex<HashMap<String, VecDeque<UpdateOutcome>>>,
    failing_clusters: HashSet<String>,
    fail_enumeration: bool,
    calls: Mutex<Vec<EcsCall>>,
}

impl FakeEcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, cluster: Cluster, instances: Vec<ContainerInstance>) -> Self {
        self.instances.insert(cluster.arn.clone(), instances);
        self.clusters.push(cluster);
        self
    }

    pub fn with_outcome(self, container_instance_arn: &str, outcome: UpdateOutcome) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .entry(container_instance_arn.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Make instance listing fail for this cluster.
    pub fn with_failing_cluster(mut self, cluster_arn: &str) -> Self {
        self.failing_clusters.insert(cluster_arn.to_string());
        self
    }

    pub fn with_failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn calls(&self) -> Vec<EcsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Container instance ARNs that received an update request, in order.
    pub fn update_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EcsCall::UpdateContainerAgent {
                    container_instance_arn,
                    ..
                } => Some(container_instance_arn),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: EcsCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EcsOperations for FakeEcs {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        self.record(EcsCall::ListClusters);
        if self.fail_enumeration {
            return Err(anyhow!("AccessDeniedException: not authorized to ListClusters"));
        }
        Ok(self.clusters.iter().map(|c| c.arn.clone()).collect())
    }

    async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>> {
        self.record(EcsCall::DescribeClusters(cluster_arns.to_vec()));
        Ok(self
            .clusters
            .iter()
            .filter(|c| cluster_arns.contains(&c.arn) || cluster_arns.contains(&c.name))
            .cloned()
            .collect())
    }

    async fn list_container_instances(&self, cluster_arn: &str) -> Result<Vec<String>> {
        self.record(EcsCall::ListContainerInstances(cluster_arn.to_string()));
        if self.failing_clusters.contains(cluster_arn) {
            return Err(anyhow!("ServerException: listing failed for {cluster_arn}"));
        }
        Ok(self
            .instances
            .get(cluster_arn)
            .map(|list| {
                list.iter()
                    .map(|ci| ci.container_instance_arn.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn describe_container_instances(
        &self,
        cluster_arn: &str,
        instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>> {
        self.record(EcsCall::DescribeContainerInstances(cluster_arn.to_string()));
        Ok(self
            .instances
            .get(cluster_arn)
            .map(|list| {
                list.iter()
                    .filter(|ci| instance_arns.contains(&ci.container_instance_arn))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_container_agent(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> UpdateOutcome {
        self.record(EcsCall::UpdateContainerAgent {
            cluster_arn: cluster_arn.to_string(),
            container_instance_arn: container_instance_arn.to_string(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .get_mut(container_instance_arn)
            .and_then(VecDeque::pop_front)
            .unwrap_or(UpdateOutcome::NoUpdateAvailable)
    }
}
