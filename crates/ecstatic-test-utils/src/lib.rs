//! Shared test utilities for ecstatic
//!
//! ## Modules
//!
//! - [`aws`]: AWS region detection for integration tests
//! - [`fixtures`]: Builders for clusters and container instances

pub mod aws;
pub mod fixtures;

// Re-export commonly used items
pub use aws::get_test_region;
pub use fixtures::{InstanceBuilder, cluster, instance};
