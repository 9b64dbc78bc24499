//! ecstatic-common - Shared types for the ECS fleet agent
//!
//! This crate holds the fleet model used by the agent and its test fixtures,
//! without any AWS SDK dependencies. SDK responses are converted into these
//! types at the API boundary, so everything downstream works with plain,
//! already-normalized values.
//!
//! ## Modules
//!
//! - [`defaults`]: Default configuration values and environment variable names
//! - [`instance`]: Cluster and container instance model
//! - [`outcome`]: Result of a single agent update request

pub mod defaults;
pub mod instance;
pub mod outcome;

// Re-export commonly used types
pub use instance::{AgentUpdateStatus, Cluster, ContainerInstance, VersionInfo};
pub use outcome::UpdateOutcome;
