//! Slack-compatible incoming webhook

use super::{Notifier, NotifyError};
use anyhow::{Context, Result};
use ecstatic_common::defaults::AGENT_NAME;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Posts `{"text": "@ecstatic: <message>"}` to a webhook URL.
///
/// Without a URL every notification is a logged no-op.
pub struct SlackWebhook {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SlackPayload {
    text: String,
}

impl SlackWebhook {
    /// Create a webhook sink; `None` disables delivery.
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        if webhook_url.is_some() {
            debug!("Webhook notifications enabled");
        } else {
            info!("Webhook notifications disabled, no webhook URL configured");
        }

        Ok(Self {
            webhook_url,
            client,
        })
    }

    pub fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    fn payload(message: &str) -> SlackPayload {
        SlackPayload {
            text: format!("@{AGENT_NAME}: {message}"),
        }
    }

    /// POST one message. Returns `Ok(())` without a request when disabled.
    pub async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let Some(webhook_url) = self.webhook_url.as_deref() else {
            return Ok(());
        };

        debug!(webhook_url = %webhook_url, "Sending webhook notification");

        let response = self
            .client
            .post(webhook_url)
            .json(&Self::payload(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Webhook notification sent");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::Status { status, body })
        }
    }
}

impl Notifier for SlackWebhook {
    async fn notify(&self, message: &str) {
        if !self.enabled() {
            info!("skipping notification, webhook URL is undefined");
            return;
        }

        match self.send(message).await {
            Ok(()) => {}
            Err(NotifyError::Status { status, body }) => {
                warn!(status = %status, body = %body, "Webhook returned an error");
            }
            Err(e) => {
                warn!(error = %e, "Failed to deliver webhook notification");
            }
        }
    }
}
