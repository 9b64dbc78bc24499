//! Cluster scan orchestration
//!
//! A scan walks clusters one at a time. Each cluster gets its own verdict and
//! its own failure boundary: an API error or an unhealthy instance in one
//! cluster never stops the scan of the next one.

use crate::aws::{EcsOperations, TimeoutEcs};
use crate::health;
use crate::notify::Notifier;
use crate::update::drive_updates;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use ecstatic_common::Cluster;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a scan did with one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClusterOutcome {
    /// No container instances registered
    Empty,
    /// At least one instance is unhealthy, no update was attempted
    Unhealthy { alerts: Vec<String> },
    /// An agent update was requested on this instance
    UpdateRequested { ec2_instance_id: String },
    /// Healthy, but no instance accepted an update request
    NoActionTaken,
    /// A listing or describe call failed
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterReport {
    pub cluster_arn: String,
    #[serde(flatten)]
    pub outcome: ClusterOutcome,
}

/// Result of one scan run
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when the cluster list itself could not be fetched
    pub enumeration_error: Option<String>,
    pub clusters: Vec<ClusterReport>,
}

impl ScanReport {
    fn count(&self, pred: impl Fn(&ClusterOutcome) -> bool) -> usize {
        self.clusters.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn scanned(&self) -> usize {
        self.clusters.len()
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ClusterOutcome::Empty))
    }

    pub fn unhealthy(&self) -> usize {
        self.count(|o| matches!(o, ClusterOutcome::Unhealthy { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ClusterOutcome::Failed { .. }))
    }

    pub fn updates_requested(&self) -> usize {
        self.count(|o| matches!(o, ClusterOutcome::UpdateRequested { .. }))
    }

    /// Alerts produced by unhealthy clusters, whether or not a webhook delivered them.
    pub fn alerts_raised(&self) -> usize {
        self.clusters
            .iter()
            .map(|c| match &c.outcome {
                ClusterOutcome::Unhealthy { alerts } => alerts.len(),
                _ => 0,
            })
            .sum()
    }

    /// Emit the run summary as one log line.
    pub fn log_summary(&self) {
        if let Some(error) = &self.enumeration_error {
            error!(error = %error, "could not enumerate clusters");
        }

        let duration_ms = (self.finished_at - self.started_at).num_milliseconds();
        info!(
            scanned = self.scanned(),
            skipped = self.skipped(),
            unhealthy = self.unhealthy(),
            failed = self.failed(),
            updates_requested = self.updates_requested(),
            alerts_raised = self.alerts_raised(),
            duration_ms,
            "scan complete"
        );
    }
}

/// Drives health checks and agent updates across clusters
pub struct Scanner<E, N> {
    ecs: TimeoutEcs<E>,
    notifier: N,
}

impl<E, N> Scanner<E, N>
where
    E: EcsOperations,
    N: Notifier,
{
    /// Every ECS call made through the scanner is bounded by `api_timeout`.
    pub fn new(ecs: E, notifier: N, api_timeout: Duration) -> Self {
        Self {
            ecs: TimeoutEcs::new(ecs, api_timeout),
            notifier,
        }
    }

    pub fn ecs(&self) -> &E {
        self.ecs.inner()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Scan every cluster in the account and region.
    pub async fn scan_all_clusters(&self) -> ScanReport {
        let started_at = Utc::now();

        let arns = match self.ecs.list_clusters().await {
            Ok(arns) => arns,
            Err(e) => {
                return ScanReport {
                    started_at,
                    finished_at: Utc::now(),
                    enumeration_error: Some(format!("{e:#}")),
                    clusters: Vec::new(),
                };
            }
        };

        info!(count = arns.len(), "found clusters");
        self.scan_arns(started_at, &arns).await
    }

    /// Scan only the given clusters (ARNs or names), in the order given.
    pub async fn scan_clusters(&self, clusters: &[String]) -> ScanReport {
        self.scan_arns(Utc::now(), clusters).await
    }

    async fn scan_arns(&self, started_at: DateTime<Utc>, cluster_arns: &[String]) -> ScanReport {
        let mut clusters = Vec::with_capacity(cluster_arns.len());
        for arn in cluster_arns {
            clusters.push(self.scan_cluster_arn(arn).await);
        }

        ScanReport {
            started_at,
            finished_at: Utc::now(),
            enumeration_error: None,
            clusters,
        }
    }

    /// Describe a cluster by ARN or name, then scan it.
    ///
    /// The report is keyed on the resolved ARN when the describe succeeds.
    pub async fn scan_cluster_arn(&self, cluster: &str) -> ClusterReport {
        let described = self.ecs.describe_clusters(&[cluster.to_string()]).await;

        let found = match described {
            Ok(clusters) => clusters
                .into_iter()
                .find(|c| c.arn == cluster || c.name == cluster),
            Err(e) => {
                return ClusterReport {
                    cluster_arn: cluster.to_string(),
                    outcome: fail(cluster, e),
                };
            }
        };

        match found {
            Some(found) => ClusterReport {
                outcome: self.scan_cluster(&found).await,
                cluster_arn: found.arn,
            },
            None => ClusterReport {
                cluster_arn: cluster.to_string(),
                outcome: fail(cluster, anyhow!("cluster not found")),
            },
        }
    }

    /// Assess one cluster and, if it is healthy, request at most one update.
    pub async fn scan_cluster(&self, cluster: &Cluster) -> ClusterOutcome {
        match self.try_scan_cluster(cluster).await {
            Ok(outcome) => outcome,
            Err(e) => fail(&cluster.arn, e),
        }
    }

    async fn try_scan_cluster(&self, cluster: &Cluster) -> Result<ClusterOutcome> {
        info!(cluster_name = %cluster.name, cluster_arn = %cluster.arn, "checking cluster");

        let instance_arns = self.ecs.list_container_instances(&cluster.arn).await?;
        if instance_arns.is_empty() {
            info!(cluster_name = %cluster.name, "skipping cluster, no container instances");
            return Ok(ClusterOutcome::Empty);
        }

        let instances = self
            .ecs
            .describe_container_instances(&cluster.arn, &instance_arns)
            .await?;
        debug!(cluster_arn = %cluster.arn, count = instances.len(), "described container instances");

        let assessment = health::assess(&cluster.arn, &instances);
        if !assessment.is_healthy() {
            for finding in &assessment.findings {
                warn!(
                    ec2_instance_id = %finding.instance.ec2_instance_id,
                    cluster_arn = %cluster.arn,
                    "{}",
                    finding.status
                );
                debug!(instance = ?finding.instance, "unhealthy container instance");
                self.notifier.notify(&finding.alert).await;
            }
            warn!(
                cluster_name = %cluster.name,
                unhealthy = assessment.findings.len(),
                "skipping updates, cluster has unhealthy instances"
            );
            return Ok(ClusterOutcome::Unhealthy {
                alerts: assessment.alerts().map(str::to_string).collect(),
            });
        }

        let run = drive_updates(&self.ecs, &self.notifier, cluster, &instances).await;
        Ok(match run.requested {
            Some(ec2_instance_id) => ClusterOutcome::UpdateRequested { ec2_instance_id },
            None => ClusterOutcome::NoActionTaken,
        })
    }
}

fn fail(cluster_arn: &str, e: anyhow::Error) -> ClusterOutcome {
    let error = format!("{e:#}");
    error!(cluster_arn = %cluster_arn, error = %error, "cluster scan failed");
    ClusterOutcome::Failed { error }
}
