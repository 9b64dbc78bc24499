//! AWS client modules
//!
//! - context: shared SDK configuration
//! - ecs: ECS control-plane client and the `EcsOperations` seam
//! - error: ECS error-code classification

pub mod context;
pub mod ecs;
pub mod error;

pub use context::{AwsContext, FromAwsContext};
pub use ecs::{EcsClient, EcsOperations, TimeoutEcs};
pub use error::{AwsError, classify_aws_error};
