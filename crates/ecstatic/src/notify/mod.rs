//! Outbound notifications
//!
//! Delivery is best-effort: a [`Notifier`] never reports failure to its
//! caller. Implementations log what went wrong and move on.

pub mod slack;

pub use slack::SlackWebhook;

use thiserror::Error;

/// Errors that can occur when delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("webhook returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Sink for human-readable alert strings
#[allow(async_fn_in_trait)]
pub trait Notifier: Send + Sync {
    /// Deliver `message`. Must not fail or panic.
    async fn notify(&self, message: &str);
}
