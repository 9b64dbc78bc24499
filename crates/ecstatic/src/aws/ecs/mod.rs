//! ECS control-plane client

mod convert;
mod operations;
mod paging;

pub use operations::{EcsOperations, TimeoutEcs};

#[cfg(test)]
pub use operations::MockEcsOperations;

use crate::aws::context::{AwsContext, FromAwsContext};
use crate::aws::error::classify_sdk_error;
use anyhow::{Context, Result};
use aws_sdk_ecs::Client;
use aws_sdk_ecs::error::DisplayErrorContext;
use ecstatic_common::defaults::{DESCRIBE_CLUSTERS_BATCH, DESCRIBE_CONTAINER_INSTANCES_BATCH};
use ecstatic_common::{Cluster, ContainerInstance, UpdateOutcome};
use tracing::{debug, warn};

/// ECS client for inspecting clusters and requesting agent updates
pub struct EcsClient {
    pub(crate) client: Client,
}

impl FromAwsContext for EcsClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ecs_client(),
        }
    }
}

impl EcsClient {
    /// Create a new ECS client (loads AWS config from environment)
    pub async fn new(region: Option<&str>) -> Self {
        let ctx = AwsContext::new(region, None).await;
        Self::from_context(&ctx)
    }

    /// List every cluster ARN in the account/region, following pagination.
    pub async fn list_clusters(&self) -> Result<Vec<String>> {
        let arns = paging::collect_pages(|next_token| async move {
            let response = self
                .client
                .list_clusters()
                .set_next_token(next_token)
                .send()
                .await
                .context("Failed to list clusters")?;

            Ok::<_, anyhow::Error>((
                response.cluster_arns().to_vec(),
                response.next_token().map(str::to_string),
            ))
        })
        .await?;

        debug!(count = arns.len(), "Listed clusters");
        Ok(arns)
    }

    /// Describe clusters by ARN, in batches the API accepts.
    pub async fn describe_clusters(&self, cluster_arns: &[String]) -> Result<Vec<Cluster>> {
        paging::in_batches(cluster_arns, DESCRIBE_CLUSTERS_BATCH, |batch| async move {
            let response = self
                .client
                .describe_clusters()
                .set_clusters(Some(batch))
                .send()
                .await
                .context("Failed to describe clusters")?;

            for failure in response.failures() {
                warn!(failure = %convert::failure(failure), "Cluster could not be described");
            }

            Ok::<_, anyhow::Error>(
                response
                    .clusters()
                    .iter()
                    .filter_map(convert::cluster)
                    .collect::<Vec<_>>(),
            )
        })
        .await
    }

    /// List the container instance ARNs registered to a cluster.
    pub async fn list_container_instances(&self, cluster_arn: &str) -> Result<Vec<String>> {
        let arns = paging::collect_pages(|next_token| async move {
            let response = self
                .client
                .list_container_instances()
                .cluster(cluster_arn)
                .set_next_token(next_token)
                .send()
                .await
                .with_context(|| {
                    format!("Failed to list container instances for cluster {cluster_arn}")
                })?;

            Ok::<_, anyhow::Error>((
                response.container_instance_arns().to_vec(),
                response.next_token().map(str::to_string),
            ))
        })
        .await?;

        debug!(cluster_arn = %cluster_arn, count = arns.len(), "Listed container instances");
        Ok(arns)
    }

    /// Describe container instances, preserving the order the API returns.
    ///
    /// Any per-instance describe failure fails the whole call.
    pub async fn describe_container_instances(
        &self,
        cluster_arn: &str,
        instance_arns: &[String],
    ) -> Result<Vec<ContainerInstance>> {
        paging::in_batches(
            instance_arns,
            DESCRIBE_CONTAINER_INSTANCES_BATCH,
            |batch| async move {
                let response = self
                    .client
                    .describe_container_instances()
                    .cluster(cluster_arn)
                    .set_container_instances(Some(batch))
                    .send()
                    .await
                    .with_context(|| {
                        format!("Failed to describe container instances for cluster {cluster_arn}")
                    })?;

                convert::ensure_described(cluster_arn, response.failures())?;

                response
                    .container_instances()
                    .iter()
                    .map(convert::container_instance)
                    .collect::<Result<Vec<_>>>()
            },
        )
        .await
    }

    /// Request an agent update and classify the result.
    pub async fn update_container_agent(
        &self,
        cluster_arn: &str,
        container_instance_arn: &str,
    ) -> UpdateOutcome {
        let result = self
            .client
            .update_container_agent()
            .cluster(cluster_arn)
            .container_instance(container_instance_arn)
            .send()
            .await;

        match result {
            Ok(_) => UpdateOutcome::Requested,
            Err(e) => {
                let detail = DisplayErrorContext(&e).to_string();
                classify_sdk_error(&e).into_update_outcome(detail)
            }
        }
    }
}
