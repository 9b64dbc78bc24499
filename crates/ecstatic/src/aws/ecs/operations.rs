//! ECS operations trait for testing

use super::EcsClient;
use anyhow::{Result, anyhow};
use ecstatic_common::{Cluster, ContainerInstance, UpdateOutcome};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Trait for the ECS calls the scanner makes.
///
/// This trait abstracts the ECS client so the health and update logic can be
/// exercised against fakes without hitting real AWS.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait EcsOperations: Send + Sync {
    /// List every cluster ARN
    async fn list_clusters(&self) -> Result<Vec<String>>;

    /// Describe clusters by ARN
    async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>>;

    /// List the container instance ARNs of a cluster
    async fn list_container_instances(&self, cluster_arn: &str) -> Result<Vec<String>>;

    /// Describe container instances of a cluster
    async fn describe_container_instances(
        &self,
        cluster_arn: &str,
        instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>>;

    /// Request an agent update on one container instance
    async fn update_container_agent(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> UpdateOutcome;
}

impl EcsOperations for EcsClient {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        EcsClient::list_clusters(self).await
    }

    async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>> {
        EcsClient::describe_clusters(self, cluster_arns).await
    }

    async fn list_container_instances(&self, cluster_arn: &str) -> Result<Vec<String>> {
        EcsClient::list_container_instances(self, cluster_arn).await
    }

    async fn describe_container_instances(
        &self,
        cluster_arn: &str,
        instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>> {
        EcsClient::describe_container_instances(self, cluster_arn, instance_arns).await
    }

    async fn update_container_agent(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> UpdateOutcome {
        EcsClient::update_container_agent(self, cluster_arn, container_instance_arn).await
    }
}

/// Bounds every call of the wrapped operations with a timeout.
///
/// A timed-out update becomes [`UpdateOutcome::UnexpectedError`]; any other
/// timed-out call becomes an error. Nothing is retried.
pub struct TimeoutEcs<E> {
    inner: E,
    timeout: Duration,
}

impl<E> TimeoutEcs<E> {
    pub fn new(inner: E, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_secs = self.timeout.as_secs(), "ECS call timed out");
                Err(anyhow!("{operation} timed out after {}s", self.timeout.as_secs()))
            }
        }
    }
}

impl<E: EcsOperations> EcsOperations for TimeoutEcs<E> {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        self.bounded("ListClusters", self.inner.list_clusters()).await
    }

    async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>> {
        self.bounded("DescribeClusters", self.inner.describe_clusters(cluster_arns)).await
    }

    async fn list_container_instances(&self, cluster_arn: &str) -> Result<Vec<String>> {
        self.bounded(
            "ListContainerInstances",
            self.inner.list_container_instances(cluster_arn),
        )
        .await
    }

    async fn describe_container_instances(
        &self,
        cluster_arn: &str,
        instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>> {
        self.bounded(
            "DescribeContainerInstances",
            self.inner.describe_container_instances(cluster_arn, instance_arns),
        )
        .await
    }

    async fn update_container_agent(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> UpdateOutcome {
        let call = self
            .inner
            .update_container_agent(cluster_arn, container_instance_arn);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => UpdateOutcome::UnexpectedError(format!(
                "UpdateContainerAgent timed out after {}s",
                self.timeout.as_secs()
            )),
        }
    }
}
