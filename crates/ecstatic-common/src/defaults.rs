//! Default configuration values
//!
//! These constants keep the CLI, the environment surface and the tests in
//! agreement about names and defaults.

/// Name used to address the channel in notification text (`@ecstatic: ...`)
pub const AGENT_NAME: &str = "ecstatic";

/// Environment variable holding the log verbosity
pub const ENV_LOG_LEVEL: &str = "ECSTATIC_LOG_LEVEL";

/// Environment variable holding the notification webhook URL
pub const ENV_WEBHOOK_URL: &str = "ECSTATIC_WEBHOOK_URL";

/// Environment variable holding the per-call control-plane timeout
pub const ENV_API_TIMEOUT_SECS: &str = "ECSTATIC_API_TIMEOUT_SECS";

/// Environment variable holding the webhook request timeout
pub const ENV_NOTIFY_TIMEOUT_SECS: &str = "ECSTATIC_NOTIFY_TIMEOUT_SECS";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default timeout for a single ECS API call, in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default timeout for a single webhook POST, in seconds
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Maximum ARNs accepted by one `DescribeClusters` call
pub const DESCRIBE_CLUSTERS_BATCH: usize = 100;

/// Maximum ARNs accepted by one `DescribeContainerInstances` call
pub const DESCRIBE_CONTAINER_INSTANCES_BATCH: usize = 100;

/// Placeholder for container instances the API reports without an EC2 id
pub const UNKNOWN_INSTANCE_ID: &str = "unknown";
