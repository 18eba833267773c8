#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for dqa
//!
//! This crate delivers rendered notification payloads to incoming webhooks,
//! with connection pooling and retry logic.

mod client;

pub use client::{NetClient, NetConfig};

use async_trait::async_trait;
use dqa_errors::{Error, UserFacingError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured result of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub delivered: bool,
    pub detail: String,
}

impl NotificationOutcome {
    #[must_use]
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn undelivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
        }
    }
}

/// Sends a payload to a messaging webhook.
///
/// Delivery failures are part of the outcome; an `Err` is reserved for
/// failures of the transport itself.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, payload: &Value, webhook: &str) -> Result<NotificationOutcome, Error>;
}

/// Webhook transport on top of [`NetClient`]
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: NetClient,
}

impl WebhookClient {
    #[must_use]
    pub fn new(client: NetClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &dqa_config::NetworkConfig) -> Result<Self, Error> {
        Ok(Self::new(NetClient::new(NetConfig::from(config))?))
    }
}

#[async_trait]
impl NotificationTransport for WebhookClient {
    async fn send(&self, payload: &Value, webhook: &str) -> Result<NotificationOutcome, Error> {
        let response = match self.client.post_json(webhook, payload).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "webhook request failed");
                return Ok(NotificationOutcome::undelivered(format!(
                    "Notification failed: {}",
                    e.user_message()
                )));
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, "webhook accepted notification");
            return Ok(NotificationOutcome::delivered("Notification succeeded."));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, body = %body, "webhook rejected notification");
        Ok(NotificationOutcome::undelivered(format!(
            "Request to webhook returned error {}: {body}",
            status.as_u16()
        )))
    }
}
