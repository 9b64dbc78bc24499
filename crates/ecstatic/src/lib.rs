//! ecstatic: keeps ECS container agents current
//!
//! Each run checks every cluster's container instances, refuses to touch a
//! cluster with a disconnected agent or failed agent update, and otherwise
//! requests an agent update on at most one instance per cluster. Alerts and
//! update actions go to a Slack-compatible webhook.

pub mod aws;
pub mod config;
pub mod health;
pub mod logging;
pub mod notify;
pub mod scan;
pub mod update;

#[cfg(test)]
pub(crate) mod testing;
